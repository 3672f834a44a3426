//! Armor and subsystem damage.
//!
//! Deferred damage records queued by collision resolution are drained here.
//! Each record damages the plates under its arc. A hull area whose broken
//! plate ratio reaches the design threshold exposes its systems, and every
//! exposed system is rolled against a normal CDF centred on its `damage50`.

use rand::Rng;
use tracing::debug;

use starwake_core::commands::Damage;
use starwake_core::constants::{ARMOR_JITTER_MEAN, ARMOR_JITTER_SIGMA};
use starwake_core::defects::defects_for;
use starwake_core::enums::ShipArea;
use starwake_core::math::{normal_cdf, AngleRange};
use starwake_core::ship::{area_range, Ship};

use crate::die::{gaussian, Die};
use crate::world::SpatialWorld;

/// Drain and apply every damage record queued for `ship`.
pub fn run(ship: &mut Ship, world: &mut SpatialWorld, rng: &mut impl Rng, die: &mut Die) {
    for damage in world.resolve_object_damage(ship.id()) {
        apply_damage(ship, &damage, rng, die);
    }
    check_death(ship);
}

/// Apply one damage record.
pub fn apply_damage(ship: &mut Ship, damage: &Damage, rng: &mut impl Rng, die: &mut Die) {
    damage_plates(ship, &damage.arc, damage.amount, rng);

    for area in ShipArea::ALL {
        let (broken, total) = ship.armor.broken_plates_in(&area_range(area));
        if broken == 0 || total == 0 {
            continue;
        }
        let ratio = broken as f64 / total as f64;
        if ratio < ship.design.armor.area_damage_ratio {
            continue;
        }
        for system in ship.systems_in_area(area) {
            let damage50 = ship.damage50(system);
            let probability = normal_cdf(damage50, damage50 / 2.0, damage.amount * ratio);
            let key = format!("{}:{}", ship.id(), system.name());
            if !die.success(&key, probability) {
                continue;
            }
            let defects = defects_for(system.kind());
            if defects.is_empty() {
                continue;
            }
            let defect = defects[rng.gen_range(0..defects.len())];
            ship.apply_defect(system, &defect);
        }
    }
}

/// Damage every plate, leaving systems alone.
pub fn damage_all_plates(ship: &mut Ship, amount: f64, rng: &mut impl Rng) {
    damage_plates(ship, &AngleRange::full(), amount, rng);
}

fn damage_plates(ship: &mut Ship, arc: &AngleRange, amount: f64, rng: &mut impl Rng) {
    if amount <= 0.0 {
        return;
    }
    for plate in ship.armor.plates_in_range(arc) {
        let jitter = gaussian(rng, ARMOR_JITTER_MEAN, ARMOR_JITTER_SIGMA).max(0.0);
        ship.armor.damage_plate(plate, amount * jitter);
    }
}

/// Destroy an expendable ship once enough of its systems are broken.
pub fn check_death(ship: &mut Ship) {
    if !ship.expendable || ship.state.destroyed {
        return;
    }
    if ship.broken_systems_ratio() >= ship.design.death_broken_ratio {
        ship.state.destroyed = true;
        debug!(id = %ship.id(), "ship destroyed by system damage");
    }
}
