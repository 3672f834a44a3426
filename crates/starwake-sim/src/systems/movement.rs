//! Ship movement: warp drive, thrusters, afterburner and rotation.
//!
//! The smart pilot turns the player's maneuvering and rotation inputs into a
//! ship-local command according to its modes. Thrusters then activate in
//! proportion to how well their push direction matches the command, paying
//! energy per activation. Velocity and turn speed changes are queued on the
//! world, never written directly.

use glam::DVec2;
use rand::Rng;
use tracing::{debug, warn};

use starwake_core::enums::{EnergyConsumer, ManeuveringMode, RotationMode};
use starwake_core::math::{angle_of, clamp_unit, direction, rotate, to_global};
use starwake_core::ship::Ship;
use starwake_flight::helm::{match_global_speed, rotate_to_target, HelmCapacity};

use crate::die::gaussian;
use crate::systems::damage::damage_all_plates;
use crate::systems::energy::try_spend_energy;
use crate::world::SpatialWorld;

pub fn run(ship: &mut Ship, world: &mut SpatialWorld, rng: &mut impl Rng, dt: f64) {
    if dt <= 0.0 || ship.state.destroyed {
        return;
    }
    let capacity = HelmCapacity::from_ship(ship);

    if update_warp(ship, world, rng, dt) {
        // Warp sets the velocity outright; thrusters idle.
        for thruster in &mut ship.thrusters {
            thruster.active = 0.0;
            thruster.afterburner_active = 0.0;
        }
        let warp_velocity =
            direction(ship.state.angle) * ship.warp.current_level * ship.design.warp.speed_per_level;
        world.change_velocity(ship.id(), warp_velocity - ship.state.velocity);
    } else {
        let command = maneuvering_command(ship, world, &capacity, rng, dt);
        apply_thrust(ship, world, command, dt);
    }

    apply_rotation(ship, world, &capacity, dt);
}

/// Advance the warp drive. Returns true while the ship is in warp.
fn update_warp(ship: &mut Ship, world: &SpatialWorld, rng: &mut impl Rng, dt: f64) -> bool {
    let design = ship.design.warp.clone();
    let warp = &mut ship.warp;

    for change in warp.pending.drain(..) {
        let level = i16::from(warp.desired_level) + i16::from(change);
        warp.desired_level = level.clamp(0, i16::from(design.max_level)) as u8;
    }

    if warp.desired_level > 0 {
        let blocked = world
            .query_area(ship.state.position, ship.state.radius + design.proximity_threshold)
            .iter()
            .any(|other| other.is_corporal() && &other.id != ship.id());
        if blocked {
            debug!(id = %ship.id(), "warp blocked by nearby object");
            ship.warp.desired_level = 0;
        }
    }

    let warp = &mut ship.warp;
    let was_warping = warp.is_warping();
    let desired = f64::from(warp.desired_level);
    if warp.current_level < desired {
        warp.current_level = (warp.current_level + design.charge_rate * dt).min(desired);
    } else if warp.current_level > desired {
        warp.current_level = (warp.current_level - design.decharge_rate * dt).max(desired);
    }
    if !warp.is_warping() {
        return false;
    }

    let level = warp.current_level;
    if !was_warping {
        let physical_speed = ship.state.velocity.length();
        damage_all_plates(ship, design.damage_per_physical_speed * physical_speed, rng);
    }
    let warp_speed = level * design.speed_per_level;
    damage_all_plates(ship, design.damage_per_warp_speed * warp_speed * dt, rng);

    let cost = design.energy_per_level_second * level * dt;
    if !try_spend_energy(&mut ship.reactor, cost, EnergyConsumer::Warp) {
        debug!(id = %ship.id(), "warp starved of energy");
        ship.warp.desired_level = 0;
    }
    true
}

/// Ship-local `(boost, strafe)` command after the smart pilot.
fn maneuvering_command(
    ship: &mut Ship,
    world: &SpatialWorld,
    capacity: &HelmCapacity,
    rng: &mut impl Rng,
    dt: f64,
) -> DVec2 {
    let pilot = &ship.design.smart_pilot;
    let input = clamp_unit(ship.smart_pilot.maneuvering);
    let commanded_velocity = to_global(input * pilot.max_speed, ship.state.angle);

    let command = match ship.smart_pilot.maneuvering_mode {
        ManeuveringMode::Direct => input,
        ManeuveringMode::Velocity => match_global_speed(dt, capacity, &ship.state, commanded_velocity),
        ManeuveringMode::Target => {
            let target = ship
                .weapons_target
                .as_ref()
                .and_then(|id| world.summary(id))
                .filter(|t| !t.destroyed);
            match target {
                Some(target) => match_global_speed(dt, capacity, &ship.state, target.velocity + commanded_velocity),
                None => {
                    warn!(id = %ship.id(), "maneuvering target lost, reverting to direct");
                    ship.smart_pilot.maneuvering_mode = ManeuveringMode::Direct;
                    input
                }
            }
        }
    };

    let offset_factor = ship.smart_pilot.offset_factor;
    if offset_factor > 0.0 && command != DVec2::ZERO {
        let error = gaussian(rng, 0.0, ship.design.smart_pilot.max_error_angle * offset_factor);
        clamp_unit(rotate(command, error))
    } else {
        clamp_unit(command)
    }
}

fn apply_thrust(ship: &mut Ship, world: &mut SpatialWorld, command: DVec2, dt: f64) {
    let efficiency = ship.maneuvering.efficiency_factor.max(0.0);
    let design = ship.design.clone();

    // 1. Activation per thruster, paid up front
    let mut activations = vec![0.0; ship.thrusters.len()];
    for (i, (thruster, thruster_design)) in ship.thrusters.iter().zip(&design.thrusters).enumerate() {
        if thruster.broken() {
            continue;
        }
        let activation = command.dot(direction(thruster_design.angle)).clamp(0.0, 1.0);
        if activation <= 0.0 {
            continue;
        }
        let cost = thruster_design.energy_cost * activation * dt;
        if try_spend_energy(&mut ship.reactor, cost, EnergyConsumer::Thrusters) {
            activations[i] = activation;
        }
    }

    // 2. Afterburner fuel, shared by every active thruster
    let afterburner = ship.maneuvering.afterburner_command.clamp(0.0, 1.0);
    let mut afterburner_scale = 0.0;
    if afterburner > 0.0 && activations.iter().any(|&a| a > 0.0) && !ship.maneuvering.broken() {
        let needed = design.maneuvering.afterburner_fuel_per_second * afterburner * dt;
        let burned = needed.min(ship.reactor.afterburner_fuel);
        ship.reactor.afterburner_fuel -= burned;
        if needed > 0.0 {
            afterburner_scale = afterburner * burned / needed;
        }
    }

    // 3. Sum pushes in the local frame
    let mut acceleration = DVec2::ZERO;
    for ((thruster, thruster_design), &activation) in
        ship.thrusters.iter_mut().zip(&design.thrusters).zip(&activations)
    {
        thruster.active = activation;
        thruster.afterburner_active = if activation > 0.0 { afterburner_scale } else { 0.0 };
        if activation <= 0.0 {
            continue;
        }
        let push = direction(thruster_design.angle + thruster.angle_error);
        let strength = thruster_design.capacity * thruster.available_capacity * efficiency * activation
            + thruster_design.afterburner_capacity * thruster.afterburner_active * activation;
        acceleration += push * strength;
    }

    if acceleration != DVec2::ZERO {
        world.change_velocity(ship.id(), to_global(acceleration, ship.state.angle) * dt);
    }
}

fn apply_rotation(ship: &mut Ship, world: &mut SpatialWorld, capacity: &HelmCapacity, dt: f64) {
    if ship.maneuvering.broken() {
        return;
    }
    let input = ship.smart_pilot.rotation.clamp(-1.0, 1.0);
    let mut command = match ship.smart_pilot.rotation_mode {
        RotationMode::Direct => input,
        RotationMode::Target => {
            let target = ship
                .weapons_target
                .as_ref()
                .and_then(|id| world.summary(id))
                .filter(|t| !t.destroyed);
            match target {
                Some(target) => {
                    let bearing = angle_of(target.position - ship.state.position);
                    let offset = input * ship.design.smart_pilot.max_target_offset;
                    rotate_to_target(dt, capacity, &ship.state, bearing + offset)
                }
                None => {
                    warn!(id = %ship.id(), "rotation target lost, reverting to direct");
                    ship.smart_pilot.rotation_mode = RotationMode::Direct;
                    input
                }
            }
        }
    };
    if command == 0.0 {
        return;
    }
    let cost = ship.design.maneuvering.rotation_energy_cost * command.abs() * dt;
    if !try_spend_energy(&mut ship.reactor, cost, EnergyConsumer::Rotation) {
        command = 0.0;
    }
    if command != 0.0 {
        world.change_turn_speed(ship.id(), command * capacity.rotation * dt);
    }
}
