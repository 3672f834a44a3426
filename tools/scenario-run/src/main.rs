//! scenario-run: headless driver for the starwake simulation.
//!
//! Usage:
//!   scenario-run <scenario.json> [--ticks N] [--dt SECONDS] [--seed N]
//!
//! The scenario file carries the sim config, named ship designs, the initial
//! objects and any opening orders/commands. The final state is printed as a
//! JSON summary on stdout. Logging goes to stderr, filtered by `RUST_LOG`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use starwake_core::commands::{Order, ShipCommand};
use starwake_core::config::SimConfig;
use starwake_core::constants::DT;
use starwake_core::design::ShipDesign;
use starwake_core::enums::{DockingMode, Faction, SpaceObjectKind};
use starwake_core::objects::{Asteroid, ObjectState, SpaceObject, Waypoint};
use starwake_core::ship::Ship;
use starwake_core::{ObjectId, Result, SimError};
use starwake_sim::SimulationEngine;

const DEFAULT_TICKS: u64 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    config: SimConfig,
    designs: BTreeMap<String, ShipDesign>,
    objects: Vec<ScenarioObject>,
    orders: Vec<ScenarioOrder>,
    commands: Vec<ScenarioCommand>,
    ticks: Option<u64>,
    dt: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
enum ScenarioObject {
    Ship {
        id: ObjectId,
        design: String,
        position: DVec2,
        #[serde(default)]
        angle: f64,
        #[serde(default)]
        velocity: DVec2,
        #[serde(default)]
        faction: Faction,
        #[serde(default)]
        expendable: bool,
    },
    Asteroid {
        id: ObjectId,
        position: DVec2,
        radius: f64,
        #[serde(default)]
        velocity: DVec2,
    },
    Waypoint {
        id: ObjectId,
        position: DVec2,
        #[serde(default)]
        title: String,
    },
}

#[derive(Debug, Deserialize)]
struct ScenarioOrder {
    ships: Vec<ObjectId>,
    order: Order,
}

#[derive(Debug, Deserialize)]
struct ScenarioCommand {
    ship: ObjectId,
    command: ShipCommand,
}

#[derive(Debug, Serialize)]
struct Summary {
    tick: u64,
    elapsed_secs: f64,
    live: BTreeMap<String, usize>,
    destroyed: usize,
    ships: Vec<ShipSummary>,
}

#[derive(Debug, Serialize)]
struct ShipSummary {
    id: ObjectId,
    position: DVec2,
    velocity: DVec2,
    angle: f64,
    armor: f64,
    energy: f64,
    broken_systems_ratio: f64,
    docking: DockingMode,
    warp_level: f64,
}

struct Options {
    scenario: PathBuf,
    ticks: Option<u64>,
    dt: Option<f64>,
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage();
        process::exit(1);
    }

    let options = match parse_options(&args[1..]) {
        Some(options) => options,
        None => {
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = run(&options) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "scenario-run: starwake headless scenario driver\n\
         \n\
         Usage: scenario-run <scenario.json> [options]\n\
         \n\
           --ticks <N>       Number of ticks to simulate (default: scenario or {DEFAULT_TICKS})\n\
           --dt <seconds>    Tick length (default: scenario or {DT})\n\
           --seed <N>        Override the scenario seed\n\
         \n\
         Example:\n\
         \n\
           RUST_LOG=debug scenario-run scenarios/duel.json --ticks 400\n"
    );
}

fn parse_options(args: &[String]) -> Option<Options> {
    let mut options = Options {
        scenario: PathBuf::from(args.first()?),
        ticks: None,
        dt: None,
        seed: None,
    };
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--ticks" => options.ticks = Some(value?.parse().ok()?),
            "--dt" => options.dt = Some(value?.parse().ok()?),
            "--seed" => options.seed = Some(value?.parse().ok()?),
            other => {
                eprintln!("Unknown option: {other}");
                return None;
            }
        }
        i += 2;
    }
    Some(options)
}

fn run(options: &Options) -> Result<()> {
    let text = std::fs::read_to_string(&options.scenario)?;
    let mut scenario: Scenario = serde_json::from_str(&text)?;
    if let Some(seed) = options.seed {
        scenario.config.seed = seed;
    }
    scenario.config.validate()?;

    let ticks = options.ticks.or(scenario.ticks).unwrap_or(DEFAULT_TICKS);
    let dt = options.dt.or(scenario.dt).unwrap_or(DT);
    if !(dt > 0.0) {
        return Err(SimError::Config(format!("dt must be positive, got {dt}")));
    }

    let mut designs = BTreeMap::new();
    for (name, mut design) in std::mem::take(&mut scenario.designs) {
        design.name = name.clone();
        design.validate()?;
        designs.insert(name, Arc::new(design));
    }

    let mut engine = SimulationEngine::new(scenario.config.clone());
    let objects = scenario
        .objects
        .into_iter()
        .map(|object| build_object(object, &designs))
        .collect::<Result<Vec<_>>>()?;
    info!(objects = objects.len(), ticks, dt, "scenario loaded");
    engine.world_mut().insert_bulk(objects)?;

    // Orders and commands need live ships, so land the inserts first.
    engine.tick(dt);
    for order in scenario.orders {
        engine.world_mut().queue_order(&order.ships, order.order);
    }
    for command in scenario.commands {
        engine.queue_ship_command(command.ship, command.command);
    }

    for _ in 1..ticks {
        let snapshot = engine.tick(dt);
        debug!(tick = snapshot.time.tick, objects = snapshot.objects.len(), "tick");
    }

    let summary = summarize(&engine);
    info!(
        tick = summary.tick,
        ships = summary.ships.len(),
        destroyed = summary.destroyed,
        "scenario complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn build_object(object: ScenarioObject, designs: &BTreeMap<String, Arc<ShipDesign>>) -> Result<SpaceObject> {
    Ok(match object {
        ScenarioObject::Ship {
            id,
            design,
            position,
            angle,
            velocity,
            faction,
            expendable,
        } => {
            let design = match designs.get(&design) {
                Some(design) => Arc::clone(design),
                None if design == ShipDesign::default().name => Arc::new(ShipDesign::default()),
                None => {
                    return Err(SimError::InvalidDesign {
                        design,
                        message: format!("unknown design for ship {id}"),
                    })
                }
            };
            let state = ObjectState::new(id, position, design.radius)
                .with_angle(angle)
                .with_velocity(velocity)
                .with_faction(faction);
            let mut ship = Ship::new(state, design);
            ship.expendable = expendable;
            ship.into()
        }
        ScenarioObject::Asteroid {
            id,
            position,
            radius,
            velocity,
        } => Asteroid {
            state: ObjectState::new(id, position, radius).with_velocity(velocity),
        }
        .into(),
        ScenarioObject::Waypoint { id, position, title } => Waypoint {
            state: ObjectState::new(id, position, 1.0),
            title,
        }
        .into(),
    })
}

fn summarize(engine: &SimulationEngine) -> Summary {
    let snapshot = engine.snapshot();
    let mut live: BTreeMap<String, usize> = BTreeMap::new();
    for object in &snapshot.objects {
        *live.entry(kind_name(object.kind()).to_owned()).or_default() += 1;
    }
    let ships = snapshot
        .objects
        .iter()
        .filter_map(SpaceObject::as_ship)
        .map(|ship| ShipSummary {
            id: ship.id().clone(),
            position: ship.state.position,
            velocity: ship.state.velocity,
            angle: ship.state.angle,
            armor: ship.armor.total_health(),
            energy: ship.reactor.energy,
            broken_systems_ratio: ship.broken_systems_ratio(),
            docking: ship.docking.mode,
            warp_level: ship.warp.current_level,
        })
        .collect();
    Summary {
        tick: snapshot.time.tick,
        elapsed_secs: snapshot.time.elapsed_secs,
        live,
        destroyed: snapshot.destroyed,
        ships,
    }
}

fn kind_name(kind: SpaceObjectKind) -> &'static str {
    match kind {
        SpaceObjectKind::Ship => "ship",
        SpaceObjectKind::Projectile => "projectile",
        SpaceObjectKind::Explosion => "explosion",
        SpaceObjectKind::Asteroid => "asteroid",
        SpaceObjectKind::Waypoint => "waypoint",
    }
}
