//! Tests for the spatial world, collisions, field of view and the ship managers.

use std::sync::Arc;

use glam::DVec2;
use proptest::prelude::*;

use starwake_core::commands::{Order, ShipCommand};
use starwake_core::config::SimConfig;
use starwake_core::constants::MAX_RADAR_RANGE;
use starwake_core::design::{ExplosionDesign, ProjectileDesign, ShipDesign};
use starwake_core::enums::*;
use starwake_core::math::direction;
use starwake_core::objects::{Asteroid, Explosion, ObjectState, Projectile, SpaceObject, Waypoint};
use starwake_core::ship::Ship;
use starwake_core::state::WorldSnapshot;
use starwake_core::{ObjectId, SimError};

use crate::engine::SimulationEngine;
use crate::world::SpatialWorld;

const DT: f64 = 0.05;

fn oid(id: &str) -> ObjectId {
    ObjectId::new(id)
}

fn ship(id: &str, position: DVec2, design: ShipDesign) -> Ship {
    Ship::new(ObjectState::new(id, position, 1.0), Arc::new(design))
}

fn asteroid(id: &str, position: DVec2, radius: f64) -> Asteroid {
    Asteroid {
        state: ObjectState::new(id, position, radius),
    }
}

fn ship_of(engine: &SimulationEngine, id: &str) -> Ship {
    engine.world().ship(&oid(id)).expect("ship should be live")
}

fn count_kind(snapshot: &WorldSnapshot, kind: SpaceObjectKind) -> usize {
    snapshot.objects.iter().filter(|o| o.kind() == kind).count()
}

// ---- Determinism ----

fn duel(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    let world = engine.world_mut();
    world
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    let mut b = ship("ship-b", DVec2::new(1500.0, 200.0), ShipDesign::default());
    b.state.angle = 180.0;
    world.insert(b).unwrap();
    engine.tick(DT);
    let world = engine.world_mut();
    world.queue_order(&[oid("ship-a")], Order::Attack { target: oid("ship-b") });
    engine.queue_ship_command("ship-b", ShipCommand::SetManeuvering { boost: 0.5, strafe: 0.3 });
    engine.queue_ship_command("ship-b", ShipCommand::SetRotation { value: 0.2 });
    engine
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = duel(12345);
    let mut engine_b = duel(12345);
    for _ in 0..200 {
        let json_a = serde_json::to_string(&engine_a.tick(DT)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

// ---- SpatialWorld: insertion and lifecycle ----

#[test]
fn test_insert_rejects_bad_radius_and_duplicates() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    let err = world.insert(asteroid("rock-a", DVec2::ZERO, 0.0)).unwrap_err();
    assert!(matches!(err, SimError::InvalidRadius { .. }));

    world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap();
    let err = world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap_err();
    assert!(matches!(err, SimError::DuplicateId(_)), "queued id is taken");

    world.update(DT);
    let err = world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap_err();
    assert!(matches!(err, SimError::DuplicateId(_)), "live id is taken");
}

#[test]
fn test_inserts_become_visible_on_update() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap();
    assert!(world.summary(&oid("rock-a")).is_none(), "inserts are queued");
    world.update(DT);
    assert!(world.summary(&oid("rock-a")).is_some());
}

#[test]
fn test_destroyed_objects_are_collected() {
    let mut world = SpatialWorld::new(&SimConfig {
        gc_interval_secs: 1.0,
        ..Default::default()
    });
    world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap();
    world.update(DT);
    world.destroy(&oid("rock-a"));
    world.update(DT);
    assert_eq!(world.destroyed_ids(), vec![oid("rock-a")]);
    assert!(world.objects().is_empty(), "destroyed objects are not live");
    for _ in 0..25 {
        world.update(DT);
    }
    assert!(world.destroyed_ids().is_empty());
    assert!(world.summary(&oid("rock-a")).is_none(), "GC removed the object");
}

#[test]
fn test_destroyed_id_can_be_reused() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap();
    world.update(DT);
    world.destroy(&oid("rock-a"));
    world.update(DT);
    world.insert(asteroid("rock-a", DVec2::new(100.0, 0.0), 7.0)).unwrap();
    world.update(DT);
    let summary = world.summary(&oid("rock-a")).unwrap();
    assert!(!summary.destroyed);
    assert_eq!(summary.radius, 7.0);
}

#[test]
fn test_generated_ids_skip_taken_ones() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-1", DVec2::ZERO, 5.0)).unwrap();
    let id = world.next_id(SpaceObjectKind::Asteroid);
    assert_ne!(id, oid("rock-1"));
}

#[test]
fn test_many_queued_inserts_get_distinct_ids() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    for i in 0..2000 {
        let id = world.next_id(SpaceObjectKind::Asteroid);
        world
            .insert(asteroid(id.as_str(), DVec2::new(f64::from(i) * 50.0, 0.0), 5.0))
            .unwrap();
    }
    world.update(DT);
    assert_eq!(world.objects().len(), 2000);
}

#[test]
fn test_frozen_objects_hold_still() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    let mut rock = asteroid("rock-a", DVec2::ZERO, 5.0);
    rock.state.velocity = DVec2::new(10.0, 0.0);
    world.insert(rock).unwrap();
    world.update(DT);
    world.freeze_toggle(&[oid("rock-a")]);
    world.update(DT);
    let frozen_at = world.summary(&oid("rock-a")).unwrap();
    world.update(DT);
    let later = world.summary(&oid("rock-a")).unwrap();
    assert!(later.frozen);
    assert_eq!(later.position, frozen_at.position);
    assert_eq!(later.velocity, DVec2::ZERO);
}

#[test]
fn test_move_and_velocity_commands() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::ZERO, 5.0)).unwrap();
    world.update(DT);
    world.move_objects(&[oid("rock-a")], DVec2::new(0.0, 50.0));
    world.change_velocity(&oid("rock-a"), DVec2::new(20.0, 0.0));
    world.update(DT);
    let rock = world.summary(&oid("rock-a")).unwrap();
    assert!((rock.position - DVec2::new(1.0, 50.0)).length() < 1e-9, "at {}", rock.position);
}

#[test]
fn test_radar_range_clamped() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    world.update(DT);
    world.change_ship_radar_range(&oid("ship-a"), -50.0).unwrap();
    world.update(DT);
    assert_eq!(world.ship(&oid("ship-a")).unwrap().radar.basic_range, 0.0);

    world.change_ship_radar_range(&oid("ship-a"), 1e13).unwrap();
    world.update(DT);
    assert_eq!(world.ship(&oid("ship-a")).unwrap().radar.basic_range, MAX_RADAR_RANGE);
}

#[test]
fn test_radar_range_rejects_bad_input() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    let err = world.change_ship_radar_range(&oid("ship-a"), f64::INFINITY).unwrap_err();
    assert!(matches!(err, SimError::InvalidRange { .. }));
    let err = world.change_ship_radar_range(&oid("ship-a"), f64::NAN).unwrap_err();
    assert!(matches!(err, SimError::InvalidRange { .. }));
    let err = world.change_ship_radar_range(&oid("ship-x"), 100.0).unwrap_err();
    assert!(matches!(err, SimError::UnknownObject(_)));
    world.change_ship_radar_range(&oid("ship-a"), 100.0).unwrap();
}

#[test]
fn test_huge_radar_range_sees_everything() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(900_000.0, 0.0), 20_000.0)).unwrap();
    world.update(DT);
    world.change_ship_radar_range(&oid("ship-a"), 1e13).unwrap();
    world.update(DT);
    let arcs = world.field_of_view(&oid("ship-a")).unwrap();
    assert!(arcs.iter().any(|a| a.object == Some(oid("rock-a"))));
    assert_eq!(world.query_area(DVec2::ZERO, f64::INFINITY).len(), 2);
    assert_eq!(world.query_area(DVec2::ZERO, 1e300).len(), 2);
}

// ---- SpatialWorld: queries ----

#[test]
fn test_query_area_and_raycast() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-near", DVec2::new(300.0, 0.0), 10.0)).unwrap();
    world.insert(asteroid("rock-far", DVec2::new(900.0, 0.0), 10.0)).unwrap();
    world.insert(asteroid("rock-side", DVec2::new(0.0, 2000.0), 10.0)).unwrap();
    world.update(DT);

    let found: Vec<ObjectId> = world.query_area(DVec2::ZERO, 1000.0).into_iter().map(|s| s.id).collect();
    assert_eq!(found, vec![oid("rock-far"), oid("rock-near")]);

    let hit = world.raycast(DVec2::ZERO, DVec2::new(2000.0, 0.0), |_| true).unwrap();
    assert_eq!(hit.id, oid("rock-near"), "the first body along the ray wins");
    assert!((hit.point.x - 290.0).abs() < 1e-9);

    let hit = world
        .raycast(DVec2::ZERO, DVec2::new(2000.0, 0.0), |s| s.id != oid("rock-near"))
        .unwrap();
    assert_eq!(hit.id, oid("rock-far"));
    assert!(world.raycast(DVec2::ZERO, DVec2::new(0.0, -500.0), |_| true).is_none());
}

#[test]
fn test_field_of_view_sees_neighbours() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    let mut viewer = ship("ship-a", DVec2::ZERO, ShipDesign::default());
    viewer.state.faction = Faction::Gravitas;
    world.insert(viewer).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(500.0, 0.0), 40.0)).unwrap();
    world
        .insert(Waypoint {
            state: ObjectState::new("wp-a", DVec2::new(0.0, 500.0), 40.0),
            title: "nav".into(),
        })
        .unwrap();
    world.update(DT);

    let arcs = world.field_of_view(&oid("ship-a")).unwrap();
    assert!(arcs.iter().any(|a| a.object == Some(oid("rock-a"))));
    assert!(arcs.iter().all(|a| a.object != Some(oid("wp-a"))), "waypoints do not occlude");
    assert_eq!(arcs.first().unwrap().from_angle, 0.0);
    assert_eq!(arcs.last().unwrap().to_angle, 360.0);

    let visible = world.faction_visible_objects(Faction::Gravitas);
    assert!(visible.contains(&oid("ship-a")));
    assert!(visible.contains(&oid("rock-a")));
    assert!(!visible.contains(&oid("wp-a")));
}

#[test]
fn test_blind_radar_sees_nothing() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    let mut viewer = ship("ship-a", DVec2::ZERO, ShipDesign::default());
    viewer.radar.malfunction_range_factor = 1.0;
    world.insert(viewer).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(500.0, 0.0), 40.0)).unwrap();
    world.update(DT);
    let arcs = world.field_of_view(&oid("ship-a")).unwrap();
    assert_eq!(arcs.len(), 1);
    assert_eq!(arcs[0].object, None);
    assert_eq!(arcs[0].distance, 0.0);
}

// ---- Collisions ----

#[test]
fn test_overlapping_asteroids_separate_and_take_damage() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::ZERO, 10.0)).unwrap();
    world.insert(asteroid("rock-b", DVec2::new(15.0, 0.0), 10.0)).unwrap();
    world.update(DT);
    let a = world.summary(&oid("rock-a")).unwrap();
    let b = world.summary(&oid("rock-b")).unwrap();
    assert!((a.position.distance(b.position) - 20.0).abs() < 1e-9, "each body backs off half the overlap");
    assert!(a.velocity.x < 0.0 && b.velocity.x > 0.0, "velocities point apart");
    let health: Vec<f64> = world.objects().iter().map(|o| o.state().health).collect();
    assert_eq!(health, vec![95.0, 95.0]);
}

#[test]
fn test_projectile_detonates_on_contact() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::new(500.0, 0.0), 20.0)).unwrap();
    world
        .insert(Projectile {
            state: ObjectState::new("proj-a", DVec2::ZERO, 1.0).with_velocity(DVec2::new(1000.0, 0.0)),
            projectile_type: ProjectileType::CannonShell,
            design: ProjectileDesign::default(),
            seconds_to_live: 5.0,
            target_id: None,
            source_id: None,
        })
        .unwrap();
    for _ in 0..12 {
        world.update(DT);
    }
    let objects = world.objects();
    assert!(objects.iter().all(|o| o.kind() != SpaceObjectKind::Projectile), "projectile is spent");
    assert!(objects.iter().any(|o| o.kind() == SpaceObjectKind::Explosion), "impact leaves an explosion");
    let shell = world.summary(&oid("proj-a")).unwrap();
    assert!(shell.destroyed);
    assert!(shell.position.x <= 480.0 + 1e-9, "stopped at the surface, not at {}", shell.position);
}

#[test]
fn test_expired_projectile_explodes_in_place() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world
        .insert(Projectile {
            state: ObjectState::new("proj-a", DVec2::ZERO, 1.0).with_velocity(DVec2::new(100.0, 0.0)),
            projectile_type: ProjectileType::CannonShell,
            design: ProjectileDesign::default(),
            seconds_to_live: 0.12,
            target_id: None,
            source_id: Some(oid("ship-a")),
        })
        .unwrap();
    for _ in 0..4 {
        world.update(DT);
    }
    let objects = world.objects();
    assert_eq!(objects.len(), 1);
    match &objects[0] {
        SpaceObject::Explosion(explosion) => {
            assert_eq!(explosion.source_id, Some(oid("ship-a")));
            assert!(explosion.state.radius > explosion.design.radius, "explosions grow");
        }
        other => panic!("expected an explosion, got {:?}", other.kind()),
    }
}

#[test]
fn test_homing_projectile_turns_toward_target() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(asteroid("rock-a", DVec2::new(0.0, 3000.0), 20.0)).unwrap();
    let design = ShipDesign::default().projectiles[&ProjectileType::Missile].clone();
    world
        .insert(Projectile {
            state: ObjectState::new("proj-a", DVec2::ZERO, 3.0).with_velocity(DVec2::new(100.0, 0.0)),
            projectile_type: ProjectileType::Missile,
            design,
            seconds_to_live: 10.0,
            target_id: Some(oid("rock-a")),
            source_id: None,
        })
        .unwrap();
    for _ in 0..20 {
        world.update(DT);
    }
    let missile = world.summary(&oid("proj-a")).unwrap();
    assert!((missile.angle - 90.0).abs() < 1.0, "heading {}", missile.angle);
    assert!(missile.velocity.y > missile.velocity.x.abs(), "velocity {}", missile.velocity);
}

proptest! {
    #[test]
    fn prop_collision_never_pulls_solids_together(
        ra in 1.0f64..50.0,
        rb in 1.0f64..50.0,
        angle in 0.0f64..360.0,
        fraction in 0.05f64..0.99,
    ) {
        let mut world = SpatialWorld::new(&SimConfig::default());
        let distance = (ra + rb) * fraction;
        let b_position = direction(angle) * distance;
        world.insert(asteroid("rock-a", DVec2::ZERO, ra)).unwrap();
        world.insert(asteroid("rock-b", b_position, rb)).unwrap();
        world.update(DT);
        let a = world.summary(&oid("rock-a")).unwrap();
        let b = world.summary(&oid("rock-b")).unwrap();
        prop_assert!(a.position.distance(b.position) >= distance - 1e-9);
    }
}

// ---- Damage ----

#[test]
fn test_explosion_breaks_only_the_plate_under_it() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut design = ShipDesign {
        radius: 10.0,
        ..Default::default()
    };
    design.armor.number_of_plates = 8;
    let explosion_design = ExplosionDesign {
        radius: 2.0,
        expansion_speed: 0.0,
        damage_factor: 9_007_199_254_740_991.0,
        blast_factor: 0.0,
        seconds_to_live: 0.2,
    };
    let world = engine.world_mut();
    world.insert(ship("ship-a", DVec2::ZERO, design)).unwrap();
    world
        .insert(Explosion::new(
            oid("boom-a"),
            direction(22.5) * 11.0,
            DVec2::ZERO,
            explosion_design,
            None,
        ))
        .unwrap();

    for _ in 0..10 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    let max = ship.armor.plate_max_health;
    assert_eq!(ship.armor.plates[0].health, 0.0, "plate under the blast is gone");
    for (i, plate) in ship.armor.plates.iter().enumerate().skip(1) {
        assert_eq!(plate.health, max, "plate {i} is outside the blast");
    }
}

#[test]
fn test_ship_collision_queues_arc_damage() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(0.0, 35.0), 10.0)).unwrap();
    world.update(DT);
    let damage = world.resolve_object_damage(&oid("ship-a"));
    assert_eq!(damage.len(), 1);
    assert_eq!(damage[0].source_id, oid("rock-a"));
    assert!(damage[0].arc.contains(90.0), "hit from +Y lands on the left side: {:?}", damage[0].arc);
    assert!(!damage[0].arc.contains(270.0));
    assert!(world.resolve_object_damage(&oid("ship-a")).is_empty(), "damage drains once");
}

fn still_explosion(id: &str, position: DVec2, velocity: DVec2, radius: f64) -> Explosion {
    Explosion::new(
        oid(id),
        position,
        velocity,
        ExplosionDesign {
            radius,
            expansion_speed: 0.0,
            seconds_to_live: 10.0,
            ..Default::default()
        },
        None,
    )
}

#[test]
fn test_explosion_containing_a_body_halts_and_backs_off() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world
        .insert(still_explosion("boom", DVec2::ZERO, DVec2::new(20.0, 0.0), 50.0))
        .unwrap();
    world.insert(asteroid("rock-a", DVec2::new(10.0, 0.0), 5.0)).unwrap();
    world.update(DT);
    let boom = world.summary(&oid("boom")).unwrap();
    assert_eq!(boom.velocity, DVec2::ZERO);
    // drifted to x = 1, then pushed back by half of the 46 overlap
    assert!((boom.position - DVec2::new(-22.0, 0.0)).length() < 1e-9, "at {}", boom.position);
}

#[test]
fn test_explosion_overlapping_past_its_radius_backs_off() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world.insert(still_explosion("boom", DVec2::ZERO, DVec2::ZERO, 10.0)).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(15.0, 0.0), 30.0)).unwrap();
    world.update(DT);
    let boom = world.summary(&oid("boom")).unwrap();
    // overlap 25 exceeds the radius by 15
    assert!((boom.position - DVec2::new(-15.0, 0.0)).length() < 1e-9, "at {}", boom.position);
}

#[test]
fn test_explosion_grazing_a_body_stays_put() {
    let mut world = SpatialWorld::new(&SimConfig::default());
    world
        .insert(still_explosion("boom", DVec2::ZERO, DVec2::new(0.0, 4.0), 10.0))
        .unwrap();
    world.insert(asteroid("rock-a", DVec2::new(12.0, 0.0), 5.0)).unwrap();
    world.update(DT);
    let boom = world.summary(&oid("boom")).unwrap();
    assert_eq!(boom.velocity, DVec2::new(0.0, 4.0));
    assert!((boom.position - DVec2::new(0.0, 0.2)).length() < 1e-9, "at {}", boom.position);
}

// ---- Chain gun ----

/// `(projectiles alive, rounds spent)` after one second of continuous fire.
fn fire_for_one_second(bullets_per_second: f64) -> (usize, usize) {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut design = ShipDesign::default();
    design.chain_gun.bullet_degrees_deviation = 0.0;
    design.chain_gun.bullets_per_second = bullets_per_second;
    design.chain_gun.shell_seconds_to_live = Some(10.0);
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, design))
        .unwrap();
    engine.tick(DT);
    let before = ship_of(&engine, "ship-a").magazine.count(ProjectileType::CannonShell);

    engine.queue_ship_command("ship-a", ShipCommand::SetFiring { firing: true });
    let mut snapshot = engine.snapshot();
    for _ in 0..20 {
        snapshot = engine.tick(DT);
    }
    let fired = count_kind(&snapshot, SpaceObjectKind::Projectile);
    let after = ship_of(&engine, "ship-a").magazine.count(ProjectileType::CannonShell);
    (fired, (before - after) as usize)
}

#[test]
fn test_chain_gun_rate_of_fire() {
    for (rate, expected) in [(10.0, 9..=11), (7.0, 6..=8), (40.0, 39..=41)] {
        let (fired, spent) = fire_for_one_second(rate);
        assert!(expected.contains(&fired), "fired {fired} shots in one second at {rate}/s");
        assert_eq!(spent, fired, "one round per projectile at {rate}/s");
    }
}

#[test]
fn test_projectiles_leave_along_heading() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut design = ShipDesign::default();
    design.chain_gun.bullet_degrees_deviation = 0.0;
    design.chain_gun.shell_seconds_to_live = Some(10.0);
    let mut shooter = ship("ship-a", DVec2::ZERO, design);
    shooter.state.angle = 90.0;
    shooter.chain_gun.is_firing = true;
    engine.world_mut().insert(shooter).unwrap();
    engine.tick(DT);
    let snapshot = engine.tick(DT);
    let projectile = snapshot
        .objects
        .iter()
        .find(|o| o.kind() == SpaceObjectKind::Projectile)
        .expect("a shot was fired");
    let state = projectile.state();
    assert!(state.velocity.y > 999.0 && state.velocity.x.abs() < 1e-6);
    assert!(state.position.y > 30.0, "spawned outside the hull");
}

// ---- Movement ----

#[test]
fn test_dead_forward_thrusters_give_no_forward_speed() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let mut crippled = ship("ship-a", DVec2::ZERO, ShipDesign::default());
    crippled.thrusters[0].available_capacity = 0.0;
    crippled.thrusters[1].available_capacity = 0.0;
    engine.world_mut().insert(crippled).unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::SetManeuvering { boost: 1.0, strafe: 0.0 });
    for _ in 0..20 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    assert!(ship.state.velocity.x.abs() < 1e-9, "velocity {}", ship.state.velocity);
}

#[test]
fn test_full_boost_accelerates_forward() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::SetManeuvering { boost: 1.0, strafe: 0.0 });
    for _ in 0..20 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    // Two forward thrusters at 50 each for one second
    assert!((ship.state.velocity.x - 100.0).abs() < 1e-6, "velocity {}", ship.state.velocity);
}

#[test]
fn test_rotation_command_spins_ship() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::SetRotation { value: 1.0 });
    for _ in 0..10 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    assert!(ship.state.turn_speed > 0.0);
    assert!(ship.state.angle > 0.0 && ship.state.angle < 180.0);
}

#[test]
fn test_target_mode_needs_target() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.queue_ship_command(
        "ship-a",
        ShipCommand::SetRotationMode {
            mode: RotationMode::Target,
        },
    );
    engine.tick(DT);
    assert_eq!(ship_of(&engine, "ship-a").smart_pilot.rotation_mode, RotationMode::Direct);
}

#[test]
fn test_warp_engages_in_open_space() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::WarpUp);
    for _ in 0..10 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    assert_eq!(ship.warp.desired_level, 1);
    assert!(ship.warp.is_warping());
    assert!(ship.state.velocity.x > 0.0, "warp pushes along the heading");
}

#[test]
fn test_warp_blocked_near_objects() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let world = engine.world_mut();
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    world.insert(asteroid("rock-a", DVec2::new(200.0, 0.0), 10.0)).unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::WarpUp);
    for _ in 0..5 {
        engine.tick(DT);
    }
    let ship = ship_of(&engine, "ship-a");
    assert_eq!(ship.warp.desired_level, 0);
    assert!(!ship.warp.is_warping());
}

// ---- Docking ----

#[test]
fn test_docking_lifecycle() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let station_design = ShipDesign {
        name: "station".into(),
        radius: 50.0,
        ..Default::default()
    };
    let world = engine.world_mut();
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    // 30 + 100 + 50: surface distance 100, dead ahead
    world.insert(ship("ship-s", DVec2::new(180.0, 0.0), station_design)).unwrap();
    engine.tick(DT);

    engine.queue_ship_command("ship-a", ShipCommand::ToggleDocking);
    engine.tick(DT);
    let docker = ship_of(&engine, "ship-a");
    assert_eq!(docker.docking.mode, DockingMode::Docking);
    assert_eq!(docker.docking.target_id, Some(oid("ship-s")));

    engine.tick(DT);
    assert_eq!(ship_of(&engine, "ship-a").docking.mode, DockingMode::Docking, "still too far");

    engine.world_mut().move_objects(&[oid("ship-a")], DVec2::new(60.0, 0.0));
    engine.tick(DT);
    engine.tick(DT);
    assert_eq!(ship_of(&engine, "ship-a").docking.mode, DockingMode::Docked);
    engine.tick(DT);
    assert_eq!(engine.world().attached_to(&oid("ship-a")), Some(oid("ship-s")));

    engine.world_mut().destroy(&oid("ship-s"));
    for _ in 0..3 {
        engine.tick(DT);
    }
    assert_eq!(ship_of(&engine, "ship-a").docking.mode, DockingMode::Undocked);
    assert_eq!(engine.world().attached_to(&oid("ship-a")), None);
}

#[test]
fn test_docking_toggle_without_target_is_ignored() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.queue_ship_command("ship-a", ShipCommand::ToggleDocking);
    engine.tick(DT);
    engine.tick(DT);
    assert_eq!(ship_of(&engine, "ship-a").docking.mode, DockingMode::Undocked);
}

// ---- Automation ----

#[test]
fn test_attack_order_opens_fire() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let world = engine.world_mut();
    world.insert(ship("ship-a", DVec2::ZERO, ShipDesign::default())).unwrap();
    world
        .insert(ship("ship-b", DVec2::new(1000.0, 0.0), ShipDesign::default()))
        .unwrap();
    world.queue_order(&[oid("ship-a")], Order::Attack { target: oid("ship-b") });
    let mut snapshot = engine.snapshot();
    for _ in 0..4 {
        snapshot = engine.tick(DT);
    }
    let attacker = ship_of(&engine, "ship-a");
    assert_eq!(attacker.weapons_target, Some(oid("ship-b")));
    assert!(attacker.chain_gun.is_firing, "target sits in the kill zone");
    assert!(count_kind(&snapshot, SpaceObjectKind::Projectile) > 0);
}

#[test]
fn test_none_order_clears_task() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine
        .world_mut()
        .insert(ship("ship-a", DVec2::ZERO, ShipDesign::default()))
        .unwrap();
    engine.tick(DT);
    engine.world_mut().queue_order(
        &[oid("ship-a")],
        Order::Move {
            position: DVec2::new(5000.0, 0.0),
        },
    );
    engine.tick(DT);
    engine.tick(DT);
    assert!(ship_of(&engine, "ship-a").current_order.is_some());
    engine.world_mut().queue_order(&[oid("ship-a")], Order::None);
    engine.tick(DT);
    engine.tick(DT);
    let ship = ship_of(&engine, "ship-a");
    assert!(ship.current_order.is_none());
    assert_eq!(ship.smart_pilot.maneuvering, DVec2::ZERO);
}
