//! Simulation engine: the fixed-order tick driver.
//!
//! `SimulationEngine` owns the `SpatialWorld`, the simulation RNG, the die
//! and the clock. Ship commands are queued from outside and applied at the
//! next tick boundary. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{trace, warn};

use starwake_core::commands::ShipCommand;
use starwake_core::config::SimConfig;
use starwake_core::enums::{ManeuveringMode, RotationMode, ShellRangeMode};
use starwake_core::math::clamp_unit;
use starwake_core::ship::Ship;
use starwake_core::state::{SimTime, WorldSnapshot};
use starwake_core::ObjectId;

use crate::die::Die;
use crate::systems;
use crate::world::SpatialWorld;

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    world: SpatialWorld,
    time: SimTime,
    rng: ChaCha8Rng,
    die: Die,
    command_queue: VecDeque<(ObjectId, ShipCommand)>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: SpatialWorld::new(&config),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            die: Die::new(config.seed, config.die_roll_interval_secs),
            command_queue: VecDeque::new(),
        }
    }

    /// Queue a ship command for processing at the next tick boundary.
    pub fn queue_ship_command(&mut self, ship: impl Into<ObjectId>, command: ShipCommand) {
        self.command_queue.push_back((ship.into(), command));
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    pub fn tick(&mut self, dt: f64) -> WorldSnapshot {
        let mut commands = self.take_commands();

        // 1. Ship managers, in id order
        for id in self.world.ship_ids() {
            let Some(mut ship) = self.world.ship(&id) else {
                continue;
            };
            for command in commands.remove(&id).unwrap_or_default() {
                apply_command(&mut ship, command);
            }
            self.run_ship(&mut ship, dt);
            self.world.store_ship(ship);
        }
        for (id, dropped) in commands {
            warn!(id = %id, count = dropped.len(), "commands for unknown ship dropped");
        }

        // 2. World physics, collisions, GC
        self.world.update(dt);
        // 3. Die cache ageing
        self.die.update(dt);
        self.time.advance(dt);
        trace!(tick = self.time.tick, "tick complete");

        self.snapshot()
    }

    /// Snapshot of the current state without advancing.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.time)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the world.
    pub fn world(&self) -> &SpatialWorld {
        &self.world
    }

    /// Mutable world access for spawning and world commands.
    pub fn world_mut(&mut self) -> &mut SpatialWorld {
        &mut self.world
    }

    fn take_commands(&mut self) -> BTreeMap<ObjectId, Vec<ShipCommand>> {
        let mut by_ship: BTreeMap<ObjectId, Vec<ShipCommand>> = BTreeMap::new();
        for (id, command) in self.command_queue.drain(..) {
            by_ship.entry(id).or_default().push(command);
        }
        by_ship
    }

    /// Run every manager for one ship.
    fn run_ship(&mut self, ship: &mut Ship, dt: f64) {
        systems::automation::run(ship, &mut self.world, dt);
        systems::damage::run(ship, &mut self.world, &mut self.rng, &mut self.die);
        systems::energy::run(ship, dt);
        systems::movement::run(ship, &mut self.world, &mut self.rng, dt);
        systems::chain_gun::run(ship, &mut self.world, &mut self.rng, dt);
        systems::docking::run(ship, &mut self.world, &mut self.rng);
    }
}

/// Apply one player command to a ship.
fn apply_command(ship: &mut Ship, command: ShipCommand) {
    match command {
        ShipCommand::SetManeuvering { boost, strafe } => {
            ship.smart_pilot.maneuvering = clamp_unit(DVec2::new(boost, strafe));
        }
        ShipCommand::SetRotation { value } => {
            ship.smart_pilot.rotation = value.clamp(-1.0, 1.0);
        }
        ShipCommand::SetAfterburner { value } => {
            ship.maneuvering.afterburner_command = value.clamp(0.0, 1.0);
        }
        ShipCommand::SetManeuveringMode { mode } => {
            if mode == ManeuveringMode::Target && ship.weapons_target.is_none() {
                warn!(id = %ship.id(), "target maneuvering mode needs a weapons target");
            } else {
                ship.smart_pilot.maneuvering_mode = mode;
            }
        }
        ShipCommand::SetRotationMode { mode } => {
            if mode == RotationMode::Target && ship.weapons_target.is_none() {
                warn!(id = %ship.id(), "target rotation mode needs a weapons target");
            } else {
                ship.smart_pilot.rotation_mode = mode;
            }
        }
        ShipCommand::SetFiring { firing } => {
            ship.chain_gun.is_firing = firing;
        }
        ShipCommand::SetProjectile { projectile } => match projectile {
            Some(p) if !ship.design.chain_gun.projectile_types.contains(&p) => {
                warn!(id = %ship.id(), projectile = ?p, "projectile not supported by chain gun");
            }
            _ => ship.chain_gun.projectile = projectile,
        },
        ShipCommand::SetShellRange { value } => {
            ship.chain_gun.shell_range = value.clamp(0.0, 1.0);
        }
        ShipCommand::SetShellRangeMode { mode } => {
            if mode == ShellRangeMode::Target && ship.weapons_target.is_none() {
                warn!(id = %ship.id(), "target shell range mode needs a weapons target");
            } else {
                ship.chain_gun.shell_range_mode = mode;
            }
        }
        ShipCommand::SetTarget { target } => {
            ship.weapons_target = target;
        }
        ShipCommand::WarpUp => ship.warp.pending.push(1),
        ShipCommand::WarpDown => ship.warp.pending.push(-1),
        ShipCommand::ToggleDocking => ship.docking.toggle_requested = true,
    }
}
