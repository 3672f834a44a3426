//! Gunner-assist: ballistic prediction and kill-zone checks.

use glam::DVec2;

use starwake_core::constants::*;
use starwake_core::design::{ChainGunDesign, ExplosionDesign};
use starwake_core::math::{direction, lerp};
use starwake_core::objects::ObjectSummary;

/// Result of [`predict_hit_location`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPrediction {
    /// Where the target will be when the shot arrives.
    pub location: DVec2,
    /// Seconds until impact.
    pub time: f64,
    /// False when the solver stopped on a fallback estimate.
    pub converged: bool,
}

/// Where to aim so that a shell fired now meets a constant-velocity target.
///
/// The time-to-impact is refined iteratively: distance over effective muzzle
/// speed gives a time, the target is extrapolated over that time, repeat.
/// Non-finite, too slow or too distant estimates stop the loop and the last
/// valid estimate is returned unconverged.
pub fn predict_hit_location(
    shooter_position: DVec2,
    shooter_velocity: DVec2,
    muzzle_speed: f64,
    target_position: DVec2,
    target_velocity: DVec2,
) -> HitPrediction {
    let mut prediction = HitPrediction {
        location: target_position,
        time: 0.0,
        converged: false,
    };
    for _ in 0..PREDICTION_MAX_ITERATIONS {
        let offset = prediction.location - shooter_position;
        let distance = offset.length();
        if distance <= f64::EPSILON {
            prediction.converged = true;
            return prediction;
        }
        let effective_speed = muzzle_speed + shooter_velocity.dot(offset / distance);
        if effective_speed < PREDICTION_MIN_SPEED {
            break;
        }
        let time = distance / effective_speed;
        if !time.is_finite() || time > PREDICTION_MAX_SECS {
            break;
        }
        let location = target_position + target_velocity * time;
        if !location.is_finite() {
            break;
        }
        let settled = (time - prediction.time).abs() < PREDICTION_TOLERANCE_SECS;
        prediction.location = location;
        prediction.time = time;
        if settled {
            prediction.converged = true;
            return prediction;
        }
    }
    prediction
}

/// Shell range commanded by a normalized value in `[0, 1]`.
pub fn direct_shell_range(design: &ChainGunDesign, normalized: f64) -> f64 {
    lerp(design.min_shell_range, design.max_shell_range, normalized.clamp(0.0, 1.0))
}

/// Seconds a shell needs to travel `range`, bounded to the gun's shell range.
pub fn shell_seconds_to_live(design: &ChainGunDesign, range: f64) -> f64 {
    if design.bullet_speed <= 0.0 {
        return 0.0;
    }
    range.clamp(design.min_shell_range, design.max_shell_range) / design.bullet_speed
}

/// The gun's pose at fire time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shooter {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Firing bearing in degrees.
    pub angle: f64,
    pub muzzle_speed: f64,
    /// Standard deviation of the firing angle (degrees).
    pub deviation_degrees: f64,
}

/// True if a shell fired now would detonate close enough to hurt `target`.
///
/// The detonation point after `seconds_to_live` is compared with the target's
/// position extrapolated to the same time. The accepted band is the target
/// radius widened by the blast radius and the angular spread at that range.
pub fn is_target_in_kill_zone(
    shooter: &Shooter,
    seconds_to_live: f64,
    explosion: &ExplosionDesign,
    target: &ObjectSummary,
) -> bool {
    let shell_velocity = shooter.velocity + direction(shooter.angle) * shooter.muzzle_speed;
    let detonation = shooter.position + shell_velocity * seconds_to_live;
    let target_at = target.position + target.velocity * seconds_to_live;
    let travel = shooter.muzzle_speed * seconds_to_live;
    let spread = travel * shooter.deviation_degrees.to_radians().tan().abs();
    let threshold = target.radius + explosion.blast_radius() + spread;
    detonation.distance(target_at) <= threshold
}
