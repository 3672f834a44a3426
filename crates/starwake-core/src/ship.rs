//! Ships: a space object carrying a full set of subsystems.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::commands::Order;
use crate::constants::{FRONT_ARC, REAR_ARC};
use crate::defects::DefectDescriptor;
use crate::design::ShipDesign;
use crate::enums::{ShipArea, SystemKind};
use crate::ids::ObjectId;
use crate::math::{to_degrees_delta, AngleRange};
use crate::objects::ObjectState;
use crate::subsystems::*;

/// Addresses one damageable subsystem of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemRef {
    Thruster(usize),
    ChainGun,
    Reactor,
    Radar,
    SmartPilot,
    Magazine,
    Maneuvering,
    Docking,
}

impl SystemRef {
    pub fn kind(self) -> SystemKind {
        match self {
            SystemRef::Thruster(_) => SystemKind::Thruster,
            SystemRef::ChainGun => SystemKind::ChainGun,
            SystemRef::Reactor => SystemKind::Reactor,
            SystemRef::Radar => SystemKind::Radar,
            SystemRef::SmartPilot => SystemKind::SmartPilot,
            SystemRef::Magazine => SystemKind::Magazine,
            SystemRef::Maneuvering => SystemKind::Maneuvering,
            SystemRef::Docking => SystemKind::Docking,
        }
    }

    /// Stable name used in die keys and logs.
    pub fn name(self) -> String {
        match self {
            SystemRef::Thruster(i) => format!("thruster-{i}"),
            SystemRef::ChainGun => "chain-gun".into(),
            SystemRef::Reactor => "reactor".into(),
            SystemRef::Radar => "radar".into(),
            SystemRef::SmartPilot => "smart-pilot".into(),
            SystemRef::Magazine => "magazine".into(),
            SystemRef::Maneuvering => "maneuvering".into(),
            SystemRef::Docking => "docking".into(),
        }
    }
}

/// Local hull arc of an area.
pub fn area_range(area: ShipArea) -> AngleRange {
    match area {
        ShipArea::Front => AngleRange::new(FRONT_ARC.0, FRONT_ARC.1),
        ShipArea::Rear => AngleRange::new(REAR_ARC.0, REAR_ARC.1),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub state: ObjectState,
    #[serde(skip)]
    pub design: Arc<ShipDesign>,
    pub design_name: String,
    pub armor: Armor,
    pub reactor: Reactor,
    pub radar: Radar,
    pub magazine: Magazine,
    pub chain_gun: ChainGun,
    pub thrusters: Vec<Thruster>,
    pub smart_pilot: SmartPilot,
    pub maneuvering: Maneuvering,
    pub docking: Docking,
    pub warp: Warp,
    pub weapons_target: Option<ObjectId>,
    /// Expendable ships are destroyed once enough of their systems break.
    pub expendable: bool,
    /// Order being executed by the automation.
    pub current_order: Option<Order>,
}

impl Ship {
    /// Build a ship at full health. The radius always comes from the design.
    pub fn new(mut state: ObjectState, design: Arc<ShipDesign>) -> Self {
        state.radius = design.radius;
        Self {
            state,
            design_name: design.name.clone(),
            armor: Armor::new(&design.armor),
            reactor: Reactor::new(&design.reactor),
            radar: Radar {
                basic_range: design.radar.basic_range,
                malfunction_range_factor: 0.0,
            },
            magazine: Magazine::new(&design.magazine),
            chain_gun: ChainGun::default(),
            thrusters: vec![Thruster::default(); design.thrusters.len()],
            smart_pilot: SmartPilot::default(),
            maneuvering: Maneuvering::default(),
            docking: Docking::default(),
            warp: Warp::default(),
            weapons_target: None,
            expendable: false,
            current_order: None,
            design,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.state.id
    }

    pub fn all_systems(&self) -> Vec<SystemRef> {
        let mut systems: Vec<SystemRef> = (0..self.thrusters.len()).map(SystemRef::Thruster).collect();
        systems.extend([
            SystemRef::ChainGun,
            SystemRef::Reactor,
            SystemRef::Radar,
            SystemRef::SmartPilot,
            SystemRef::Magazine,
            SystemRef::Maneuvering,
            SystemRef::Docking,
        ]);
        systems
    }

    pub fn system_area(&self, system: SystemRef) -> ShipArea {
        match system {
            SystemRef::Thruster(i) => {
                let angle = self.design.thrusters.get(i).map_or(0.0, |t| t.angle);
                if to_degrees_delta(angle).abs() <= 90.0 {
                    ShipArea::Front
                } else {
                    ShipArea::Rear
                }
            }
            SystemRef::ChainGun | SystemRef::Radar | SystemRef::SmartPilot | SystemRef::Docking => {
                ShipArea::Front
            }
            SystemRef::Reactor | SystemRef::Magazine | SystemRef::Maneuvering => ShipArea::Rear,
        }
    }

    pub fn systems_in_area(&self, area: ShipArea) -> Vec<SystemRef> {
        self.all_systems()
            .into_iter()
            .filter(|&s| self.system_area(s) == area)
            .collect()
    }

    pub fn is_system_broken(&self, system: SystemRef) -> bool {
        match system {
            SystemRef::Thruster(i) => self.thrusters.get(i).map_or(true, Thruster::broken),
            SystemRef::ChainGun => self.chain_gun.broken(),
            SystemRef::Reactor => self.reactor.broken(),
            SystemRef::Radar => self.radar.broken(),
            SystemRef::SmartPilot => self.smart_pilot.broken(),
            SystemRef::Magazine => self.magazine.broken(),
            SystemRef::Maneuvering => self.maneuvering.broken(),
            SystemRef::Docking => self.docking.broken(),
        }
    }

    /// Damage at which a hit has even odds of degrading the system.
    pub fn damage50(&self, system: SystemRef) -> f64 {
        let design = &self.design;
        match system {
            SystemRef::Thruster(i) => design.thrusters.get(i).map_or(0.0, |t| t.damage50),
            SystemRef::ChainGun => design.chain_gun.damage50,
            SystemRef::Reactor => design.reactor.damage50,
            SystemRef::Radar => design.radar.damage50,
            SystemRef::SmartPilot => design.smart_pilot.damage50,
            SystemRef::Magazine => design.magazine.damage50,
            SystemRef::Maneuvering => design.maneuvering.damage50,
            SystemRef::Docking => design.docking.damage50,
        }
    }

    /// Fraction of all systems currently broken.
    pub fn broken_systems_ratio(&self) -> f64 {
        let systems = self.all_systems();
        if systems.is_empty() {
            return 0.0;
        }
        let broken = systems.iter().filter(|&&s| self.is_system_broken(s)).count();
        broken as f64 / systems.len() as f64
    }

    /// Apply one defect to a system. Returns false if the system does not own the field.
    pub fn apply_defect(&mut self, system: SystemRef, defect: &DefectDescriptor) -> bool {
        if let (SystemRef::Magazine, "ammo") = (system, defect.field) {
            for count in self.magazine.counts.values_mut() {
                *count = defect.effect.apply(*count as f64).floor() as u32;
            }
            return true;
        }
        let Some(value) = self.defect_field_mut(system, defect.field) else {
            return false;
        };
        *value = defect.effect.apply(*value);
        if system == SystemRef::Magazine {
            let design = Arc::clone(&self.design);
            self.magazine.clamp_to_capacity(&design.magazine);
        }
        true
    }

    fn defect_field_mut(&mut self, system: SystemRef, field: &str) -> Option<&mut f64> {
        match (system, field) {
            (SystemRef::Thruster(i), "angle_error") => self.thrusters.get_mut(i).map(|t| &mut t.angle_error),
            (SystemRef::Thruster(i), "available_capacity") => {
                self.thrusters.get_mut(i).map(|t| &mut t.available_capacity)
            }
            (SystemRef::ChainGun, "angle_offset") => Some(&mut self.chain_gun.angle_offset),
            (SystemRef::ChainGun, "rate_of_fire_factor") => Some(&mut self.chain_gun.rate_of_fire_factor),
            (SystemRef::Reactor, "energy") => Some(&mut self.reactor.energy),
            (SystemRef::Reactor, "energy_leak") => Some(&mut self.reactor.energy_leak),
            (SystemRef::Reactor, "efficiency_factor") => Some(&mut self.reactor.efficiency_factor),
            (SystemRef::Radar, "malfunction_range_factor") => Some(&mut self.radar.malfunction_range_factor),
            (SystemRef::SmartPilot, "offset_factor") => Some(&mut self.smart_pilot.offset_factor),
            (SystemRef::Magazine, "capacity_factor") => Some(&mut self.magazine.capacity_factor),
            (SystemRef::Maneuvering, "efficiency_factor") => Some(&mut self.maneuvering.efficiency_factor),
            (SystemRef::Maneuvering, "afterburner_fuel") => Some(&mut self.reactor.afterburner_fuel),
            (SystemRef::Docking, "ranges_factor") => Some(&mut self.docking.ranges_factor),
            _ => None,
        }
    }
}
