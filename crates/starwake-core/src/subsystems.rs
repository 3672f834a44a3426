//! Ship subsystem state.
//!
//! Plain data structs exposed for replication. Each subsystem carries the
//! parameters its defects degrade and a `broken()` predicate over them.
//! Behavior lives in the sim crate's managers.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{CHAIN_GUN_MAX_ANGLE_OFFSET, THRUSTER_MAX_ANGLE_ERROR};
use crate::design::{ArmorDesign, MagazineDesign, ReactorDesign};
use crate::enums::*;
use crate::ids::ObjectId;
use crate::math::AngleRange;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorPlate {
    pub health: f64,
}

/// Fixed ring of armor plates. Plate `i` covers `[i*w, (i+1)*w)` in ship-local degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub plates: Vec<ArmorPlate>,
    pub plate_max_health: f64,
}

impl Armor {
    pub fn new(design: &ArmorDesign) -> Self {
        Self {
            plates: vec![
                ArmorPlate {
                    health: design.plate_max_health
                };
                design.number_of_plates
            ],
            plate_max_health: design.plate_max_health,
        }
    }

    /// Angular width of one plate.
    pub fn plate_width(&self) -> f64 {
        360.0 / self.plates.len().max(1) as f64
    }

    /// Indices of every plate whose span intersects `range`.
    pub fn plates_in_range(&self, range: &AngleRange) -> Vec<usize> {
        if range.is_full() {
            return (0..self.plates.len()).collect();
        }
        let width = self.plate_width();
        let segments: Vec<(f64, f64)> = if range.from <= range.to {
            vec![(range.from, range.to)]
        } else {
            vec![(range.from, 360.0), (0.0, range.to)]
        };
        (0..self.plates.len())
            .filter(|&i| {
                let start = i as f64 * width;
                let end = start + width;
                segments.iter().any(|&(from, to)| {
                    if from == to {
                        from >= start && from < end
                    } else {
                        start < to && end > from
                    }
                })
            })
            .collect()
    }

    /// `(broken, total)` plate counts within `range`.
    pub fn broken_plates_in(&self, range: &AngleRange) -> (usize, usize) {
        let indices = self.plates_in_range(range);
        let broken = indices
            .iter()
            .filter(|&&i| self.plates[i].health <= 0.0)
            .count();
        (broken, indices.len())
    }

    /// Remove `amount` health from one plate, floored at 0.
    pub fn damage_plate(&mut self, index: usize, amount: f64) {
        if let Some(plate) = self.plates.get_mut(index) {
            plate.health = (plate.health - amount.max(0.0)).clamp(0.0, self.plate_max_health);
        }
    }

    pub fn total_health(&self) -> f64 {
        self.plates.iter().map(|p| p.health).sum()
    }
}

/// Energy ledger and afterburner fuel tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reactor {
    pub energy: f64,
    pub afterburner_fuel: f64,
    /// Scales regeneration. Degraded by defects.
    pub efficiency_factor: f64,
    /// Fraction of nominal output lost every second.
    pub energy_leak: f64,
    /// Smoothed energy draw per consumer, per minute.
    pub energy_per_minute: BTreeMap<EnergyConsumer, f64>,
    #[serde(skip)]
    pub spent_this_tick: BTreeMap<EnergyConsumer, f64>,
}

impl Reactor {
    pub fn new(design: &ReactorDesign) -> Self {
        Self {
            energy: design.max_energy,
            afterburner_fuel: design.max_afterburner_fuel,
            efficiency_factor: 1.0,
            energy_leak: 0.0,
            energy_per_minute: BTreeMap::new(),
            spent_this_tick: BTreeMap::new(),
        }
    }

    pub fn broken(&self) -> bool {
        self.efficiency_factor <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    pub basic_range: f64,
    /// Fraction of the basic range lost to malfunction.
    pub malfunction_range_factor: f64,
}

impl Radar {
    pub fn effective_range(&self) -> f64 {
        (self.basic_range * (1.0 - self.malfunction_range_factor)).max(0.0)
    }

    pub fn broken(&self) -> bool {
        self.malfunction_range_factor >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magazine {
    pub counts: BTreeMap<ProjectileType, u32>,
    pub capacity_factor: f64,
}

impl Magazine {
    pub fn new(design: &MagazineDesign) -> Self {
        Self {
            counts: design.max.clone(),
            capacity_factor: 1.0,
        }
    }

    pub fn count(&self, projectile: ProjectileType) -> u32 {
        self.counts.get(&projectile).copied().unwrap_or(0)
    }

    /// Current capacity for one type after degradation.
    pub fn capacity(&self, design: &MagazineDesign, projectile: ProjectileType) -> u32 {
        let max = design.max.get(&projectile).copied().unwrap_or(0) as f64;
        (max * self.capacity_factor.max(0.0)).floor() as u32
    }

    /// Take one round. False when empty.
    pub fn take(&mut self, projectile: ProjectileType) -> bool {
        match self.counts.get_mut(&projectile) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Clamp every count to the degraded capacity.
    pub fn clamp_to_capacity(&mut self, design: &MagazineDesign) {
        let capacities: Vec<(ProjectileType, u32)> = self
            .counts
            .keys()
            .map(|&p| (p, self.capacity(design, p)))
            .collect();
        for (projectile, capacity) in capacities {
            if let Some(count) = self.counts.get_mut(&projectile) {
                *count = (*count).min(capacity);
            }
        }
    }

    pub fn broken(&self) -> bool {
        self.capacity_factor <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainGun {
    pub is_firing: bool,
    /// Outstanding shots. Firing needs it at or below zero.
    pub cooldown: f64,
    pub projectile: Option<ProjectileType>,
    pub shell_range_mode: ShellRangeMode,
    /// Normalized range command in `[0, 1]`.
    pub shell_range: f64,
    /// Derived each tick.
    pub shell_seconds_to_live: f64,
    /// Aim error in degrees.
    pub angle_offset: f64,
    pub rate_of_fire_factor: f64,
}

impl Default for ChainGun {
    fn default() -> Self {
        Self {
            is_firing: false,
            cooldown: 0.0,
            projectile: None,
            shell_range_mode: ShellRangeMode::Direct,
            shell_range: 1.0,
            shell_seconds_to_live: 0.0,
            angle_offset: 0.0,
            rate_of_fire_factor: 1.0,
        }
    }
}

impl ChainGun {
    pub fn broken(&self) -> bool {
        self.rate_of_fire_factor <= 0.0 || self.angle_offset.abs() >= CHAIN_GUN_MAX_ANGLE_OFFSET
    }
}

/// Runtime state of one thruster. Index matches `ShipDesign::thrusters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thruster {
    /// Drift (degrees) of the push direction away from the declared angle.
    pub angle_error: f64,
    /// Fraction of design capacity still available.
    pub available_capacity: f64,
    /// Activation in `[0, 1]` from the last tick.
    pub active: f64,
    pub afterburner_active: f64,
}

impl Default for Thruster {
    fn default() -> Self {
        Self {
            angle_error: 0.0,
            available_capacity: 1.0,
            active: 0.0,
            afterburner_active: 0.0,
        }
    }
}

impl Thruster {
    pub fn broken(&self) -> bool {
        self.available_capacity <= 0.0 || self.angle_error.abs() >= THRUSTER_MAX_ANGLE_ERROR
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartPilot {
    pub rotation_mode: RotationMode,
    pub maneuvering_mode: ManeuveringMode,
    /// Rotation command in `[-1, 1]`.
    pub rotation: f64,
    /// `(boost, strafe)` command, each in `[-1, 1]`.
    pub maneuvering: DVec2,
    /// Command error scale. Grows with damage.
    pub offset_factor: f64,
}

impl SmartPilot {
    pub fn broken(&self) -> bool {
        self.offset_factor >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuvering {
    pub efficiency_factor: f64,
    /// Afterburner command in `[0, 1]`.
    pub afterburner_command: f64,
}

impl Default for Maneuvering {
    fn default() -> Self {
        Self {
            efficiency_factor: 1.0,
            afterburner_command: 0.0,
        }
    }
}

impl Maneuvering {
    pub fn broken(&self) -> bool {
        self.efficiency_factor <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Docking {
    pub mode: DockingMode,
    pub target_id: Option<ObjectId>,
    /// Scales every docking distance. Degraded by defects.
    pub ranges_factor: f64,
    /// Set by the toggle command, consumed on the next docking update.
    pub toggle_requested: bool,
}

impl Default for Docking {
    fn default() -> Self {
        Self {
            mode: DockingMode::Undocked,
            target_id: None,
            ranges_factor: 1.0,
            toggle_requested: false,
        }
    }
}

impl Docking {
    pub fn broken(&self) -> bool {
        self.ranges_factor <= 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Warp {
    pub current_level: f64,
    pub desired_level: u8,
    /// Level changes queued since the last movement update (+1 / -1).
    pub pending: Vec<i8>,
}

impl Warp {
    pub fn is_warping(&self) -> bool {
        self.current_level > 0.0
    }
}

