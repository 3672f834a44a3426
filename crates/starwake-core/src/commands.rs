//! Commands, orders and damage records.
//!
//! Everything here is queued and drained at a tick boundary, never applied mid-tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::ids::ObjectId;
use crate::math::AngleRange;

/// Per-ship control inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShipCommand {
    // --- Helm ---
    /// Boost/strafe command, each in `[-1, 1]`.
    SetManeuvering { boost: f64, strafe: f64 },
    /// Rotation command in `[-1, 1]`.
    SetRotation { value: f64 },
    /// Afterburner command in `[0, 1]`.
    SetAfterburner { value: f64 },
    SetManeuveringMode { mode: ManeuveringMode },
    SetRotationMode { mode: RotationMode },

    // --- Weapons ---
    SetFiring { firing: bool },
    SetProjectile { projectile: Option<ProjectileType> },
    /// Normalized shell range in `[0, 1]`.
    SetShellRange { value: f64 },
    SetShellRangeMode { mode: ShellRangeMode },
    SetTarget { target: Option<ObjectId> },

    // --- Drives ---
    WarpUp,
    WarpDown,
    ToggleDocking,
}

/// What an automated ship should be doing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Order {
    Move { position: DVec2 },
    Attack { target: ObjectId },
    Follow { target: ObjectId },
    None,
}

/// Deferred damage to a ship, applied on the ship's next update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub source_id: ObjectId,
    pub amount: f64,
    /// Hit arc in the defender's local frame.
    pub arc: AngleRange,
    pub duration_secs: f64,
}
