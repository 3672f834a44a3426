//! Order execution for automated ships.
//!
//! Orders arrive through the world's order queue. The current order drives
//! the smart pilot in direct mode through the helm-assist controllers, and
//! the chain gun through gunner-assist. Ships without an order are left to
//! their player's commands.

use glam::DVec2;
use tracing::debug;

use starwake_core::commands::Order;
use starwake_core::constants::{ORDER_ARRIVAL_DISTANCE, ORDER_ARRIVAL_SPEED, ORDER_FOLLOW_DISTANCE};
use starwake_core::enums::{ManeuveringMode, ProjectileType, RotationMode, ShellRangeMode};
use starwake_core::math::angle_of;
use starwake_core::objects::ObjectSummary;
use starwake_core::ship::Ship;
use starwake_core::ObjectId;
use starwake_flight::gunner::{is_target_in_kill_zone, predict_hit_location, shell_seconds_to_live, Shooter};
use starwake_flight::helm::{match_global_speed, move_to_target, rotate_to_target, stop_rotation, HelmCapacity};

use crate::world::SpatialWorld;

pub fn run(ship: &mut Ship, world: &mut SpatialWorld, dt: f64) {
    if let Some(order) = world.resolve_object_order(ship.id()) {
        debug!(id = %ship.id(), ?order, "new order");
        match order {
            Order::None => {
                ship.current_order = None;
                idle(ship);
            }
            order => ship.current_order = Some(order),
        }
    }
    if ship.state.destroyed || dt <= 0.0 {
        return;
    }
    let Some(order) = ship.current_order.clone() else {
        return;
    };

    ship.smart_pilot.maneuvering_mode = ManeuveringMode::Direct;
    ship.smart_pilot.rotation_mode = RotationMode::Direct;
    let capacity = HelmCapacity::from_ship(ship);

    let done = match order {
        Order::Move { position } => execute_move(ship, &capacity, position, dt),
        Order::Attack { target } => match live_target(world, &target) {
            Some(target) => {
                execute_attack(ship, &capacity, &target, dt);
                false
            }
            None => true,
        },
        Order::Follow { target } => match live_target(world, &target) {
            Some(target) => {
                execute_follow(ship, &capacity, &target, dt);
                false
            }
            None => true,
        },
        Order::None => true,
    };

    if done {
        debug!(id = %ship.id(), "order complete");
        ship.current_order = None;
        idle(ship);
    }
}

fn live_target(world: &SpatialWorld, id: &ObjectId) -> Option<ObjectSummary> {
    world.summary(id).filter(|t| !t.destroyed)
}

/// Zero every automated input.
fn idle(ship: &mut Ship) {
    ship.smart_pilot.maneuvering = DVec2::ZERO;
    ship.smart_pilot.rotation = 0.0;
    ship.chain_gun.is_firing = false;
}

/// Returns true once the ship has settled on `position`.
fn execute_move(ship: &mut Ship, capacity: &HelmCapacity, position: DVec2, dt: f64) -> bool {
    let distance = ship.state.position.distance(position);
    if distance <= ORDER_ARRIVAL_DISTANCE && ship.state.velocity.length() <= ORDER_ARRIVAL_SPEED {
        return true;
    }
    ship.smart_pilot.maneuvering = move_to_target(dt, capacity, &ship.state, position);
    ship.smart_pilot.rotation = if distance > ORDER_ARRIVAL_DISTANCE {
        rotate_to_target(dt, capacity, &ship.state, angle_of(position - ship.state.position))
    } else {
        stop_rotation(dt, capacity, &ship.state)
    };
    false
}

fn execute_attack(ship: &mut Ship, capacity: &HelmCapacity, target: &ObjectSummary, dt: f64) {
    ship.weapons_target = Some(target.id.clone());
    ship.chain_gun.shell_range_mode = ShellRangeMode::Target;

    let gun = &ship.design.chain_gun;
    let prediction = predict_hit_location(
        ship.state.position,
        ship.state.velocity,
        gun.bullet_speed,
        target.position,
        target.velocity,
    );
    let aim = angle_of(prediction.location - ship.state.position);
    ship.smart_pilot.rotation = rotate_to_target(dt, capacity, &ship.state, aim);
    ship.smart_pilot.maneuvering = match_global_speed(dt, capacity, &ship.state, target.velocity);

    let projectile = ship.chain_gun.projectile.unwrap_or(ProjectileType::CannonShell);
    let Some(projectile_design) = ship.design.projectiles.get(&projectile) else {
        ship.chain_gun.is_firing = false;
        return;
    };
    let shooter = Shooter {
        position: ship.state.position,
        velocity: ship.state.velocity,
        angle: ship.state.angle + ship.chain_gun.angle_offset,
        muzzle_speed: gun.bullet_speed,
        deviation_degrees: gun.bullet_degrees_deviation,
    };
    let seconds_to_live = shell_seconds_to_live(gun, target.position.distance(ship.state.position));
    ship.chain_gun.is_firing = is_target_in_kill_zone(&shooter, seconds_to_live, &projectile_design.explosion, target);
}

fn execute_follow(ship: &mut Ship, capacity: &HelmCapacity, target: &ObjectSummary, dt: f64) {
    let away = ship.state.position - target.position;
    let direction = if away.length() > f64::EPSILON { away.normalize() } else { DVec2::X };
    let standoff = target.position + direction * (target.radius + ship.state.radius + ORDER_FOLLOW_DISTANCE);

    ship.smart_pilot.maneuvering = if ship.state.position.distance(standoff) > ORDER_ARRIVAL_DISTANCE {
        move_to_target(dt, capacity, &ship.state, standoff)
    } else {
        match_global_speed(dt, capacity, &ship.state, target.velocity)
    };
    ship.smart_pilot.rotation = rotate_to_target(dt, capacity, &ship.state, angle_of(target.position - ship.state.position));
}
