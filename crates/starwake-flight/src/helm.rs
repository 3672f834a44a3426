//! Helm-assist: closed-loop position and speed controllers.
//!
//! Every controller returns a normalized command in `[-1, 1]`. Composite
//! helpers work in the ship-local frame (boost = +X, strafe = +Y) and look
//! one tick ahead to cover the one-tick latency between command and effect.

use glam::DVec2;

use starwake_core::math::{direction, to_degrees_delta, to_local};
use starwake_core::objects::ObjectState;
use starwake_core::ship::Ship;

/// Acceleration available per control axis at full command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HelmCapacity {
    pub boost: f64,
    pub strafe: f64,
    /// Degrees per second squared.
    pub rotation: f64,
}

impl HelmCapacity {
    /// Capacity of the ship's working thrusters. An axis is rated at the weaker
    /// of its two directions so the controllers can always brake.
    pub fn from_ship(ship: &Ship) -> Self {
        let efficiency = ship.maneuvering.efficiency_factor.max(0.0);
        let mut push = [0.0_f64; 4]; // +x, -x, +y, -y
        for (thruster, design) in ship.thrusters.iter().zip(&ship.design.thrusters) {
            if thruster.broken() {
                continue;
            }
            let force = direction(design.angle) * design.capacity * thruster.available_capacity * efficiency;
            push[0] += force.x.max(0.0);
            push[1] += (-force.x).max(0.0);
            push[2] += force.y.max(0.0);
            push[3] += (-force.y).max(0.0);
        }
        Self {
            boost: axis_capacity(push[0], push[1]),
            strafe: axis_capacity(push[2], push[3]),
            rotation: ship.design.maneuvering.rotation_capacity * efficiency,
        }
    }
}

fn axis_capacity(positive: f64, negative: f64) -> f64 {
    match (positive > 0.0, negative > 0.0) {
        (true, true) => positive.min(negative),
        (true, false) => positive,
        (false, true) => negative,
        (false, false) => 0.0,
    }
}

/// Command that moves a 1D body by `target_delta` and stops there.
///
/// `target_delta` is measured from where the body will be after coasting one
/// more tick at `velocity`, which is what the composite helpers pass in.
/// The braking distance is solved analytically from `velocity` and `capacity`.
/// The command then falls in one of four regimes: fine correction when the
/// target is within a single tick of thrust, soft braking when the stop point
/// would overshoot, proportional slow-down while the stop point is within one
/// tick of travel, and full authority otherwise.
pub fn accelerate_to_position(dt: f64, capacity: f64, velocity: f64, target_delta: f64) -> f64 {
    if capacity <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    let tick_authority = capacity * dt;
    let distance = target_delta.abs();
    let toward = target_delta.signum();

    // Pin-point: one tick of thrust covers the gap.
    if distance <= tick_authority * dt {
        return (target_delta / (tick_authority * dt)).clamp(-1.0, 1.0);
    }

    let approach_speed = velocity * toward;
    let braking_distance = if approach_speed > 0.0 {
        approach_speed * approach_speed / (2.0 * capacity)
    } else {
        0.0
    };
    let ideal_speed = (2.0 * capacity * distance).sqrt().min(distance / dt);

    if braking_distance >= distance {
        // Soft braking: already inside the stop point.
        return ((ideal_speed - approach_speed) / tick_authority).clamp(-1.0, 1.0) * toward;
    }
    if distance - braking_distance <= approach_speed * dt {
        // Slow down in proportion to the remaining margin.
        return ((ideal_speed - approach_speed) / tick_authority).clamp(-1.0, 1.0) * toward;
    }
    toward
}

/// Command that changes a speed by `target_delta_speed`.
pub fn accelerate_to_speed(dt: f64, capacity: f64, target_delta_speed: f64) -> f64 {
    if capacity <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    (target_delta_speed / (capacity * dt)).clamp(-1.0, 1.0)
}

/// `(boost, strafe)` command that brings the ship to rest at `target`.
pub fn move_to_target(dt: f64, capacity: &HelmCapacity, state: &ObjectState, target: DVec2) -> DVec2 {
    let next_position = state.position + state.velocity * dt;
    let delta = to_local(target - next_position, state.angle);
    let velocity = to_local(state.velocity, state.angle);
    DVec2::new(
        accelerate_to_position(dt, capacity.boost, velocity.x, delta.x),
        accelerate_to_position(dt, capacity.strafe, velocity.y, delta.y),
    )
}

/// Rotation command that settles the heading on `target_angle`.
pub fn rotate_to_target(dt: f64, capacity: &HelmCapacity, state: &ObjectState, target_angle: f64) -> f64 {
    let next_angle = state.angle + state.turn_speed * dt;
    let delta = to_degrees_delta(target_angle - next_angle);
    accelerate_to_position(dt, capacity.rotation, state.turn_speed, delta)
}

/// Rotation command that stops any spin.
pub fn stop_rotation(dt: f64, capacity: &HelmCapacity, state: &ObjectState) -> f64 {
    accelerate_to_speed(dt, capacity.rotation, -state.turn_speed)
}

/// `(boost, strafe)` command that matches a world-frame velocity.
pub fn match_global_speed(dt: f64, capacity: &HelmCapacity, state: &ObjectState, target_velocity: DVec2) -> DVec2 {
    let delta = to_local(target_velocity - state.velocity, state.angle);
    DVec2::new(
        accelerate_to_speed(dt, capacity.boost, delta.x),
        accelerate_to_speed(dt, capacity.strafe, delta.y),
    )
}
