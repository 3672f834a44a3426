//! Static design tables: ship, projectile and explosion parameters.
//!
//! Designs are loaded once (JSON or `Default`) and shared immutably by every
//! object built from them. Every field has a default so partial JSON works.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::ProjectileType;
use crate::error::{Result, SimError};

/// Explosion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionDesign {
    /// Radius at spawn.
    pub radius: f64,
    /// Radius growth per second.
    pub expansion_speed: f64,
    /// Damage per second of contact.
    pub damage_factor: f64,
    /// Push-away velocity per second of contact.
    pub blast_factor: f64,
    pub seconds_to_live: f64,
}

impl Default for ExplosionDesign {
    fn default() -> Self {
        Self {
            radius: 1.0,
            expansion_speed: 10.0,
            damage_factor: 20.0,
            blast_factor: 1.0,
            seconds_to_live: 0.5,
        }
    }
}

impl ExplosionDesign {
    /// Largest radius the explosion reaches before it expires.
    pub fn blast_radius(&self) -> f64 {
        self.radius + self.expansion_speed * self.seconds_to_live
    }
}

/// Guidance parameters for homing projectiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomingDesign {
    pub max_speed: f64,
    /// Degrees per second.
    pub rotation_capacity: f64,
    /// Speed gained per second while boosting.
    pub velocity_capacity: f64,
    pub seconds_to_live: f64,
}

impl Default for HomingDesign {
    fn default() -> Self {
        Self {
            max_speed: 800.0,
            rotation_capacity: 180.0,
            velocity_capacity: 400.0,
            seconds_to_live: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileDesign {
    pub radius: f64,
    pub homing: Option<HomingDesign>,
    pub explosion: ExplosionDesign,
}

impl Default for ProjectileDesign {
    fn default() -> Self {
        Self {
            radius: 1.0,
            homing: None,
            explosion: ExplosionDesign::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorDesign {
    pub number_of_plates: usize,
    pub plate_max_health: f64,
    /// Broken-plate ratio within a hull area that exposes the area's systems.
    pub area_damage_ratio: f64,
}

impl Default for ArmorDesign {
    fn default() -> Self {
        Self {
            number_of_plates: 16,
            plate_max_health: 200.0,
            area_damage_ratio: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorDesign {
    pub max_energy: f64,
    pub energy_per_second: f64,
    pub max_afterburner_fuel: f64,
    /// Fuel units recharged per second.
    pub afterburner_charge_rate: f64,
    /// Energy paid per fuel unit recharged.
    pub afterburner_energy_cost: f64,
    pub damage50: f64,
}

impl Default for ReactorDesign {
    fn default() -> Self {
        Self {
            max_energy: 1000.0,
            energy_per_second: 50.0,
            max_afterburner_fuel: 500.0,
            afterburner_charge_rate: 20.0,
            afterburner_energy_cost: 0.5,
            damage50: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarDesign {
    pub basic_range: f64,
    pub damage50: f64,
}

impl Default for RadarDesign {
    fn default() -> Self {
        Self {
            basic_range: 3000.0,
            damage50: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagazineDesign {
    pub max: BTreeMap<ProjectileType, u32>,
    pub damage50: f64,
}

impl Default for MagazineDesign {
    fn default() -> Self {
        Self {
            max: BTreeMap::from([
                (ProjectileType::CannonShell, 500),
                (ProjectileType::BlastCannonShell, 100),
                (ProjectileType::Missile, 10),
            ]),
            damage50: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainGunDesign {
    pub bullets_per_second: f64,
    pub bullet_speed: f64,
    /// Standard deviation of the firing angle (degrees).
    pub bullet_degrees_deviation: f64,
    pub min_shell_range: f64,
    pub max_shell_range: f64,
    /// Fixed shell time-to-live overriding the range solution.
    pub shell_seconds_to_live: Option<f64>,
    /// Supported projectile types, in auto-select preference order.
    pub projectile_types: Vec<ProjectileType>,
    pub damage50: f64,
}

impl Default for ChainGunDesign {
    fn default() -> Self {
        Self {
            bullets_per_second: 10.0,
            bullet_speed: 1000.0,
            bullet_degrees_deviation: 1.0,
            min_shell_range: 500.0,
            max_shell_range: 3000.0,
            shell_seconds_to_live: None,
            projectile_types: vec![
                ProjectileType::CannonShell,
                ProjectileType::BlastCannonShell,
                ProjectileType::Missile,
            ],
            damage50: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrusterDesign {
    /// Ship-local direction the thruster pushes the ship (degrees, 0 = forward).
    pub angle: f64,
    /// Acceleration at full activation.
    pub capacity: f64,
    /// Extra acceleration at full afterburner.
    pub afterburner_capacity: f64,
    /// Energy per second at full activation.
    pub energy_cost: f64,
    pub damage50: f64,
}

impl Default for ThrusterDesign {
    fn default() -> Self {
        Self {
            angle: 0.0,
            capacity: 50.0,
            afterburner_capacity: 50.0,
            energy_cost: 5.0,
            damage50: 20.0,
        }
    }
}

impl ThrusterDesign {
    pub fn at(angle: f64) -> Self {
        Self {
            angle,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartPilotDesign {
    /// Speed commanded by a full VELOCITY/TARGET maneuvering input.
    pub max_speed: f64,
    /// Aim offset (degrees) commanded by a full TARGET rotation input.
    pub max_target_offset: f64,
    /// Standard deviation (degrees) of the command error at full degradation.
    pub max_error_angle: f64,
    pub damage50: f64,
}

impl Default for SmartPilotDesign {
    fn default() -> Self {
        Self {
            max_speed: 300.0,
            max_target_offset: 30.0,
            max_error_angle: 45.0,
            damage50: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuveringDesign {
    /// Angular acceleration at full command (degrees per second squared).
    pub rotation_capacity: f64,
    /// Energy per second at full rotation command.
    pub rotation_energy_cost: f64,
    pub afterburner_fuel_per_second: f64,
    pub damage50: f64,
}

impl Default for ManeuveringDesign {
    fn default() -> Self {
        Self {
            rotation_capacity: 90.0,
            rotation_energy_cost: 5.0,
            afterburner_fuel_per_second: 50.0,
            damage50: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockingDesign {
    /// Surface distance within which a docking target is searched.
    pub search_range: f64,
    /// Surface distance that counts as docked.
    pub docking_distance: f64,
    /// Surface distance that completes undocking.
    pub undocking_distance: f64,
    /// Heading tolerance toward the target (degrees).
    pub angle_tolerance: f64,
    pub min_target_radius: f64,
    /// Hull damage taken when a docked ship drifts out of tolerance.
    pub penalty_damage: f64,
    pub damage50: f64,
}

impl Default for DockingDesign {
    fn default() -> Self {
        Self {
            search_range: 1000.0,
            docking_distance: 50.0,
            undocking_distance: 150.0,
            angle_tolerance: 30.0,
            min_target_radius: 20.0,
            penalty_damage: 1.0,
            damage50: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpDesign {
    pub max_level: u8,
    pub speed_per_level: f64,
    /// Levels gained per second while charging.
    pub charge_rate: f64,
    /// Levels lost per second while decharging.
    pub decharge_rate: f64,
    /// Any corporal object this close (surface distance) blocks warp.
    pub proximity_threshold: f64,
    pub damage_per_physical_speed: f64,
    pub damage_per_warp_speed: f64,
    pub energy_per_level_second: f64,
}

impl Default for WarpDesign {
    fn default() -> Self {
        Self {
            max_level: 4,
            speed_per_level: 2000.0,
            charge_rate: 0.5,
            decharge_rate: 1.0,
            proximity_threshold: 500.0,
            damage_per_physical_speed: 0.01,
            damage_per_warp_speed: 0.0001,
            energy_per_level_second: 10.0,
        }
    }
}

/// Everything needed to build a ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipDesign {
    pub name: String,
    pub radius: f64,
    pub armor: ArmorDesign,
    pub reactor: ReactorDesign,
    pub radar: RadarDesign,
    pub magazine: MagazineDesign,
    pub chain_gun: ChainGunDesign,
    pub thrusters: Vec<ThrusterDesign>,
    pub smart_pilot: SmartPilotDesign,
    pub maneuvering: ManeuveringDesign,
    pub docking: DockingDesign,
    pub warp: WarpDesign,
    pub projectiles: BTreeMap<ProjectileType, ProjectileDesign>,
    /// Fraction of broken systems that kills an expendable ship.
    pub death_broken_ratio: f64,
}

impl Default for ShipDesign {
    fn default() -> Self {
        Self {
            name: "dragonfly".into(),
            radius: 30.0,
            armor: ArmorDesign::default(),
            reactor: ReactorDesign::default(),
            radar: RadarDesign::default(),
            magazine: MagazineDesign::default(),
            chain_gun: ChainGunDesign::default(),
            thrusters: vec![
                ThrusterDesign::at(0.0),
                ThrusterDesign::at(0.0),
                ThrusterDesign::at(180.0),
                ThrusterDesign::at(180.0),
                ThrusterDesign::at(90.0),
                ThrusterDesign::at(270.0),
            ],
            smart_pilot: SmartPilotDesign::default(),
            maneuvering: ManeuveringDesign::default(),
            docking: DockingDesign::default(),
            warp: WarpDesign::default(),
            projectiles: BTreeMap::from([
                (ProjectileType::CannonShell, ProjectileDesign::default()),
                (
                    ProjectileType::BlastCannonShell,
                    ProjectileDesign {
                        radius: 2.0,
                        homing: None,
                        explosion: ExplosionDesign {
                            radius: 5.0,
                            expansion_speed: 40.0,
                            damage_factor: 10.0,
                            blast_factor: 5.0,
                            seconds_to_live: 1.0,
                        },
                    },
                ),
                (
                    ProjectileType::Missile,
                    ProjectileDesign {
                        radius: 3.0,
                        homing: Some(HomingDesign::default()),
                        explosion: ExplosionDesign {
                            radius: 10.0,
                            expansion_speed: 60.0,
                            damage_factor: 50.0,
                            blast_factor: 10.0,
                            seconds_to_live: 1.0,
                        },
                    },
                ),
            ]),
            death_broken_ratio: 0.5,
        }
    }
}

impl ShipDesign {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let design: ShipDesign = serde_json::from_str(json)?;
        design.validate()?;
        Ok(design)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| {
            Err(SimError::InvalidDesign {
                design: self.name.clone(),
                message: message.to_owned(),
            })
        };
        if !(self.radius > 0.0) {
            return fail("radius must be positive");
        }
        if self.armor.number_of_plates == 0 {
            return fail("armor needs at least one plate");
        }
        if !(self.armor.plate_max_health > 0.0) {
            return fail("plate_max_health must be positive");
        }
        if !(0.0..=1.0).contains(&self.armor.area_damage_ratio) {
            return fail("area_damage_ratio must be within [0, 1]");
        }
        if self.reactor.max_energy < 0.0 || self.reactor.max_afterburner_fuel < 0.0 {
            return fail("reactor capacities must not be negative");
        }
        if self.chain_gun.min_shell_range > self.chain_gun.max_shell_range {
            return fail("min_shell_range exceeds max_shell_range");
        }
        if !(self.chain_gun.bullet_speed > 0.0) {
            return fail("bullet_speed must be positive");
        }
        for projectile in &self.chain_gun.projectile_types {
            if !self.projectiles.contains_key(projectile) {
                return fail(&format!("chain gun supports {projectile:?} without a projectile design"));
            }
        }
        if self.projectiles.values().any(|p| !(p.radius > 0.0)) {
            return fail("projectile radius must be positive");
        }
        if !(0.0..=1.0).contains(&self.death_broken_ratio) {
            return fail("death_broken_ratio must be within [0, 1]");
        }
        Ok(())
    }
}
