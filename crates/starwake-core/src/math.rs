//! 2D geometry and numeric helpers.
//!
//! Angles are degrees, 0° along +X, growing toward +Y. Vectors are `glam::DVec2`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::PRECISION_FACTOR;

/// Round to the fixed simulation precision so derived values do not flap
/// between ticks on floating-point noise.
pub fn limit_precision(value: f64) -> f64 {
    (value * PRECISION_FACTOR).round() / PRECISION_FACTOR
}

/// Normalize an angle into `[0, 360)`.
pub fn to_positive_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Normalize an angle delta into `[-180, 180)`.
pub fn to_degrees_delta(angle: f64) -> f64 {
    to_positive_degrees(angle + 180.0) - 180.0
}

/// Direction of a vector in degrees, `[0, 360)`.
pub fn angle_of(v: DVec2) -> f64 {
    to_positive_degrees(v.y.atan2(v.x).to_degrees())
}

/// Unit vector pointing along `angle` degrees.
pub fn direction(angle: f64) -> DVec2 {
    DVec2::from_angle(angle.to_radians())
}

/// Rotate a vector by `angle` degrees.
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    direction(angle).rotate(v)
}

/// Express a world-frame vector in a frame rotated by `frame_angle`.
pub fn to_local(v: DVec2, frame_angle: f64) -> DVec2 {
    rotate(v, -frame_angle)
}

/// Express a frame-local vector in world frame.
pub fn to_global(v: DVec2, frame_angle: f64) -> DVec2 {
    rotate(v, frame_angle)
}

/// Clamp both components into `[-1, 1]`.
pub fn clamp_unit(v: DVec2) -> DVec2 {
    v.clamp(DVec2::splat(-1.0), DVec2::splat(1.0))
}

/// Linear interpolation between `from` and `to`.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Angular range in degrees, swept counter-clockwise from `from` to `to`.
///
/// `from > to` wraps through 0°. The full ring is stored as `[0, 360]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub from: f64,
    pub to: f64,
}

impl AngleRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from: to_positive_degrees(from),
            to: to_positive_degrees(to),
        }
    }

    pub fn full() -> Self {
        Self {
            from: 0.0,
            to: 360.0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.span() >= 360.0
    }

    /// Angular width in degrees.
    pub fn span(&self) -> f64 {
        if self.to >= 360.0 && self.from <= 0.0 {
            return 360.0;
        }
        (self.to - self.from).rem_euclid(360.0)
    }

    /// True if `angle` lies on the sweep (inclusive at both ends).
    pub fn contains(&self, angle: f64) -> bool {
        if self.is_full() {
            return true;
        }
        let a = to_positive_degrees(angle);
        if self.from <= self.to {
            a >= self.from && a <= self.to
        } else {
            a >= self.from || a <= self.to
        }
    }
}

/// Intersection points of two circles, ordered so that sweeping
/// counter-clockwise (around `c0`) from the first to the second passes
/// through the direction of `c1`.
///
/// Returns `None` when the circles do not cross (apart, or one inside the other).
pub fn circle_intersections(c0: DVec2, r0: f64, c1: DVec2, r1: f64) -> Option<(DVec2, DVec2)> {
    let offset = c1 - c0;
    let d = offset.length();
    if d <= f64::EPSILON || d >= r0 + r1 || d <= (r0 - r1).abs() {
        return None;
    }
    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h_sq = r0 * r0 - a * a;
    if h_sq < 0.0 {
        return None;
    }
    let h = h_sq.sqrt();
    let u = offset / d;
    let mid = c0 + u * a;
    let perp = u.perp();
    Some((mid - perp * h, mid + perp * h))
}

/// Error function, Abramowitz & Stegun 7.1.26 (max error 1.5e-7).
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

/// CDF of `Normal(mean, sd)` at `x`. A non-positive `sd` degrades to a step.
pub fn normal_cdf(mean: f64, sd: f64, x: f64) -> f64 {
    if sd <= 0.0 {
        return if x >= mean { 1.0 } else { 0.0 };
    }
    0.5 * (1.0 + erf((x - mean) / (sd * std::f64::consts::SQRT_2)))
}
