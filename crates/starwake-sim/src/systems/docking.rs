//! Docking state machine.
//!
//! Undocked -> Docking on a toggle with a suitable ship in range. Docking
//! becomes Docked once close enough and facing the target, at which point the
//! ship is attached to it. Drifting out of tolerance while docked drops back
//! to Docking with a hull penalty. Undocking completes past the undocking
//! distance. All distances are surface to surface, scaled by `ranges_factor`.

use rand::Rng;
use tracing::debug;

use starwake_core::enums::{DockingMode, SpaceObjectKind};
use starwake_core::math::{angle_of, to_degrees_delta};
use starwake_core::objects::ObjectSummary;
use starwake_core::ship::Ship;

use crate::systems::damage::damage_all_plates;
use crate::world::SpatialWorld;

pub fn run(ship: &mut Ship, world: &mut SpatialWorld, rng: &mut impl Rng) {
    if ship.state.destroyed {
        return;
    }
    let design = ship.design.docking.clone();
    let ranges_factor = ship.docking.ranges_factor.max(0.0);

    if std::mem::take(&mut ship.docking.toggle_requested) {
        toggle(ship, world);
    }

    let target = ship
        .docking
        .target_id
        .as_ref()
        .and_then(|id| world.summary(id))
        .filter(|t| !t.destroyed && &t.id != ship.id());

    match (ship.docking.mode, target) {
        (DockingMode::Undocked, _) => {}
        (_, None) => {
            debug!(id = %ship.id(), "docking target lost");
            set_mode(ship, DockingMode::Undocked);
            ship.docking.target_id = None;
        }
        (mode, Some(target)) => {
            let distance = surface_distance(ship, &target);
            let bearing = angle_of(target.position - ship.state.position);
            let facing = to_degrees_delta(bearing - ship.state.angle).abs() <= design.angle_tolerance;
            let in_reach = distance <= design.docking_distance * ranges_factor;
            match mode {
                DockingMode::Docked if !(in_reach && facing) => {
                    set_mode(ship, DockingMode::Docking);
                    damage_all_plates(ship, design.penalty_damage, rng);
                }
                DockingMode::Docking if in_reach && facing => set_mode(ship, DockingMode::Docked),
                DockingMode::Undocking if distance > design.undocking_distance * ranges_factor => {
                    set_mode(ship, DockingMode::Undocked);
                    ship.docking.target_id = None;
                }
                _ => {}
            }
        }
    }

    let attached = world.attached_to(ship.id());
    match (ship.docking.mode, &ship.docking.target_id) {
        (DockingMode::Docked, Some(target)) => {
            if attached.as_ref() != Some(target) {
                world.attach(ship.id(), target);
            }
        }
        _ => {
            if attached.is_some() {
                world.detach(ship.id());
            }
        }
    }
}

fn toggle(ship: &mut Ship, world: &SpatialWorld) {
    match ship.docking.mode {
        DockingMode::Undocked => {
            if ship.docking.broken() {
                debug!(id = %ship.id(), "docking toggle ignored, system broken");
                return;
            }
            match find_target(ship, world) {
                Some(target) => {
                    ship.docking.target_id = Some(target.id);
                    set_mode(ship, DockingMode::Docking);
                }
                None => debug!(id = %ship.id(), "no docking target in range"),
            }
        }
        DockingMode::Docked => set_mode(ship, DockingMode::Undocking),
        DockingMode::Docking => {
            set_mode(ship, DockingMode::Undocked);
            ship.docking.target_id = None;
        }
        DockingMode::Undocking => set_mode(ship, DockingMode::Docking),
    }
}

/// Nearest ship big enough to dock with, within search range.
fn find_target(ship: &Ship, world: &SpatialWorld) -> Option<ObjectSummary> {
    let design = &ship.design.docking;
    let range = design.search_range * ship.docking.ranges_factor.max(0.0);
    world
        .query_area(ship.state.position, ship.state.radius + range)
        .into_iter()
        .filter(|o| o.kind == SpaceObjectKind::Ship && &o.id != ship.id())
        .filter(|o| o.radius >= design.min_target_radius)
        .map(|o| (surface_distance(ship, &o), o))
        .filter(|(distance, _)| *distance <= range)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, o)| o)
}

fn surface_distance(ship: &Ship, other: &ObjectSummary) -> f64 {
    (ship.state.position.distance(other.position) - ship.state.radius - other.radius).max(0.0)
}

fn set_mode(ship: &mut Ship, mode: DockingMode) {
    if ship.docking.mode != mode {
        debug!(id = %ship.id(), from = ?ship.docking.mode, to = ?mode, "docking transition");
        ship.docking.mode = mode;
    }
}
