//! Defect descriptor tables.
//!
//! One static table per subsystem kind lists the parameters that damage can
//! degrade. A degradation moves a parameter one step toward its worse bound
//! and saturates there, so repeated hits are monotonic and idempotent at the
//! bound.

use serde::Serialize;

use crate::enums::SystemKind;

/// How a defect changes its field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DefectEffect {
    /// Add `step` and clamp into `[min, max]`. The sign of `step` points at the worse end.
    Degrade { min: f64, max: f64, step: f64 },
    /// Lose a fraction of a stored resource.
    Deplete { fraction: f64 },
}

impl DefectEffect {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            DefectEffect::Degrade { min, max, step } => (value + step).clamp(min, max),
            DefectEffect::Deplete { fraction } => (value * (1.0 - fraction)).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DefectDescriptor {
    pub field: &'static str,
    pub effect: DefectEffect,
}

const fn degrade(field: &'static str, min: f64, max: f64, step: f64) -> DefectDescriptor {
    DefectDescriptor {
        field,
        effect: DefectEffect::Degrade { min, max, step },
    }
}

const fn deplete(field: &'static str, fraction: f64) -> DefectDescriptor {
    DefectDescriptor {
        field,
        effect: DefectEffect::Deplete { fraction },
    }
}

const THRUSTER: &[DefectDescriptor] = &[
    degrade("angle_error", -180.0, 180.0, 10.0),
    degrade("available_capacity", 0.0, 1.0, -0.1),
];

const CHAIN_GUN: &[DefectDescriptor] = &[
    degrade("angle_offset", 0.0, 10.0, 1.0),
    degrade("rate_of_fire_factor", 0.0, 1.0, -0.1),
];

const REACTOR: &[DefectDescriptor] = &[
    deplete("energy", 0.5),
    degrade("energy_leak", 0.0, 1.0, 0.05),
    degrade("efficiency_factor", 0.0, 1.0, -0.1),
];

const RADAR: &[DefectDescriptor] = &[degrade("malfunction_range_factor", 0.0, 1.0, 0.1)];

const SMART_PILOT: &[DefectDescriptor] = &[degrade("offset_factor", 0.0, 1.0, 0.1)];

const MAGAZINE: &[DefectDescriptor] = &[
    deplete("ammo", 0.2),
    degrade("capacity_factor", 0.0, 1.0, -0.1),
];

const MANEUVERING: &[DefectDescriptor] = &[
    degrade("efficiency_factor", 0.0, 1.0, -0.1),
    deplete("afterburner_fuel", 0.5),
];

const DOCKING: &[DefectDescriptor] = &[degrade("ranges_factor", 0.0, 1.0, -0.1)];

/// Defects a subsystem kind can suffer.
pub fn defects_for(kind: SystemKind) -> &'static [DefectDescriptor] {
    match kind {
        SystemKind::Thruster => THRUSTER,
        SystemKind::ChainGun => CHAIN_GUN,
        SystemKind::Reactor => REACTOR,
        SystemKind::Radar => RADAR,
        SystemKind::SmartPilot => SMART_PILOT,
        SystemKind::Magazine => MAGAZINE,
        SystemKind::Maneuvering => MANEUVERING,
        SystemKind::Docking => DOCKING,
    }
}
