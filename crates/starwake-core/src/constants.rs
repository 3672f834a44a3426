//! Simulation constants and tuning parameters.

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 20;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Numeric stability ---

/// Fixed-precision rounding factor (values are rounded to 1/64).
pub const PRECISION_FACTOR: f64 = 64.0;

// --- World ---

/// Default interval between garbage-collection sweeps of destroyed objects.
pub const DEFAULT_GC_INTERVAL_SECS: f64 = 10.0;

/// Default spatial hash cell edge length.
pub const DEFAULT_SPATIAL_CELL_SIZE: f64 = 500.0;

/// Damage per unit of overlap for solid-vs-solid contact.
pub const DEFAULT_COLLISION_DAMAGE: f64 = 1.0;

/// Fraction of the overlap turned into separating velocity per second.
pub const DEFAULT_COLLISION_ELASTICITY: f64 = 0.2;

/// Default interval a die roll stays cached for the same key.
pub const DEFAULT_DIE_ROLL_INTERVAL_SECS: f64 = 0.5;

/// Upper bound on a ship's basic radar range.
pub const MAX_RADAR_RANGE: f64 = 1.0e6;

/// Homing projectiles boost when heading and velocity differ by more than this (degrees).
pub const HOMING_ALIGNMENT_TOLERANCE_DEG: f64 = 5.0;

// --- Armor ---

/// Mean of the per-plate damage multiplier.
pub const ARMOR_JITTER_MEAN: f64 = 20.0;

/// Standard deviation of the per-plate damage multiplier.
pub const ARMOR_JITTER_SIGMA: f64 = 4.0;

/// Front hull arc in ship-local degrees (wraps through 0).
pub const FRONT_ARC: (f64, f64) = (270.0, 90.0);

/// Rear hull arc in ship-local degrees.
pub const REAR_ARC: (f64, f64) = (90.0, 270.0);

// --- Energy ---

/// Smoothing window of the per-system energy telemetry average.
pub const ENERGY_EMA_WINDOW_SECS: f64 = 1.0;

// --- Weapons ---

/// Gap between the hull and a freshly spawned projectile.
pub const PROJECTILE_SPAWN_MARGIN: f64 = 1.0;

/// Angle offset (degrees) at which a chain gun counts as broken.
pub const CHAIN_GUN_MAX_ANGLE_OFFSET: f64 = 10.0;

/// Thruster angle error (degrees) at which a thruster counts as broken.
pub const THRUSTER_MAX_ANGLE_ERROR: f64 = 90.0;

// --- Ballistic prediction ---

/// Maximum refinement passes of the hit predictor.
pub const PREDICTION_MAX_ITERATIONS: usize = 20;

/// Time-to-impact change below which the predictor is considered converged.
pub const PREDICTION_TOLERANCE_SECS: f64 = 1e-4;

/// Time-to-impact above which the predictor gives up.
pub const PREDICTION_MAX_SECS: f64 = 600.0;

/// Effective projectile speed below which the predictor gives up.
pub const PREDICTION_MIN_SPEED: f64 = 1e-3;

// --- Automation ---

/// Distance at which a move order counts as arrived.
pub const ORDER_ARRIVAL_DISTANCE: f64 = 50.0;

/// Speed below which an arrived ship counts as settled.
pub const ORDER_ARRIVAL_SPEED: f64 = 5.0;

/// Standoff distance kept from the target by a follow order.
pub const ORDER_FOLLOW_DISTANCE: f64 = 300.0;
