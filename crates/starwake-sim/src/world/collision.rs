//! Narrow-phase collision resolution.
//!
//! Every overlapping pair is visited twice, once with each body as the
//! subject, and only the subject is affected. Position and velocity deltas
//! are accumulated and applied in one pass at the end.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec2;
use tracing::{debug, warn};

use starwake_core::commands::Damage;
use starwake_core::enums::SpaceObjectKind;
use starwake_core::math::{angle_of, circle_intersections, AngleRange};
use starwake_core::objects::{Projectile, SpaceObject};
use starwake_core::ObjectId;

use super::SpatialWorld;

/// Per-tick copy of a body taking part in collisions.
struct Contact {
    id: ObjectId,
    kind: SpaceObjectKind,
    position: DVec2,
    radius: f64,
    angle: f64,
    /// `(damage_factor, blast_factor)` for explosions.
    blast: Option<(f64, f64)>,
    projectile: Option<Projectile>,
}

#[derive(Default)]
struct Deltas {
    motion: BTreeMap<ObjectId, (DVec2, DVec2)>,
    halted: BTreeSet<ObjectId>,
}

impl Deltas {
    fn push(&mut self, id: &ObjectId, dp: DVec2, dv: DVec2) {
        let entry = self.motion.entry(id.clone()).or_default();
        entry.0 += dp;
        entry.1 += dv;
    }
}

pub(super) fn resolve(world: &mut SpatialWorld, dt: f64) {
    let contacts = snapshot(world);
    let collision_damage = world.config.collision_damage;
    let elasticity = world.config.collision_elasticity;

    let mut deltas = Deltas::default();
    let mut detonated: BTreeSet<ObjectId> = BTreeSet::new();
    let mut health_damage: BTreeMap<ObjectId, f64> = BTreeMap::new();

    for subject in contacts.values() {
        for other_id in world.index.potentials(subject.position, subject.radius) {
            if other_id == subject.id {
                continue;
            }
            let Some(other) = contacts.get(&other_id) else {
                continue;
            };
            let offset = other.position - subject.position;
            let distance = offset.length();
            let overlap = subject.radius + other.radius - distance;
            if overlap <= 0.0 {
                continue;
            }
            let unit = if distance > f64::EPSILON { offset / distance } else { DVec2::X };
            let overlap_vector = unit * overlap;

            match subject.kind {
                SpaceObjectKind::Projectile => {
                    let hits = matches!(
                        other.kind,
                        SpaceObjectKind::Ship | SpaceObjectKind::Asteroid | SpaceObjectKind::Projectile
                    );
                    if hits {
                        detonated.insert(subject.id.clone());
                    }
                }
                SpaceObjectKind::Explosion => {
                    if !other.kind.is_solid() {
                        continue;
                    }
                    if distance + other.radius <= subject.radius {
                        deltas.halted.insert(subject.id.clone());
                        deltas.push(&subject.id, overlap_vector * -0.5, DVec2::ZERO);
                    } else if overlap > subject.radius {
                        deltas.push(&subject.id, unit * -(overlap - subject.radius), DVec2::ZERO);
                    }
                }
                SpaceObjectKind::Ship | SpaceObjectKind::Asteroid => {
                    let damage = if let Some((damage_factor, blast_factor)) = other.blast {
                        deltas.push(&subject.id, DVec2::ZERO, unit * -(blast_factor * dt));
                        damage_factor * dt
                    } else if other.kind.is_solid() {
                        deltas.push(
                            &subject.id,
                            overlap_vector * -0.5,
                            overlap_vector * -0.5 * (elasticity / dt),
                        );
                        collision_damage * overlap.min(2.0 * other.radius)
                    } else {
                        continue;
                    };
                    if damage <= 0.0 {
                        continue;
                    }
                    if subject.kind == SpaceObjectKind::Ship {
                        let Some(arc) = hit_arc(subject, other, distance) else {
                            warn!(subject = %subject.id, other = %other.id, "overlap without intersection points");
                            continue;
                        };
                        world.queue_damage(
                            &subject.id,
                            Damage {
                                source_id: other.id.clone(),
                                amount: damage,
                                arc,
                                duration_secs: dt,
                            },
                        );
                    } else {
                        *health_damage.entry(subject.id.clone()).or_default() += damage;
                    }
                }
                SpaceObjectKind::Waypoint => {}
            }
        }
    }

    for id in detonated {
        let Some(projectile) = contacts.get(&id).and_then(|c| c.projectile.clone()) else {
            continue;
        };
        if let Some(object) = world.object_mut(&id) {
            object.state_mut().destroyed = true;
        }
        world.spawn_explosion(projectile.state.position, projectile.state.velocity, &projectile);
    }

    for (id, damage) in health_damage {
        if let Some(object) = world.object_mut(&id) {
            let state = object.state_mut();
            state.health -= damage;
            if state.health <= 0.0 && !state.destroyed {
                state.destroyed = true;
                debug!(id = %id, "destroyed by collision");
            }
        }
    }

    for id in &deltas.halted {
        if let Some(object) = world.object_mut(id) {
            object.state_mut().velocity = DVec2::ZERO;
        }
    }
    world.apply_deltas(deltas.motion);
}

/// Bodies eligible for collisions this tick, by id.
fn snapshot(world: &SpatialWorld) -> BTreeMap<ObjectId, Contact> {
    world
        .live_objects()
        .filter(|(_, object)| object.is_corporal() && !object.state().frozen)
        .map(|(id, object)| {
            let state = object.state();
            let contact = Contact {
                id: id.clone(),
                kind: object.kind(),
                position: state.position,
                radius: state.radius,
                angle: state.angle,
                blast: match &*object {
                    SpaceObject::Explosion(e) => Some((e.design.damage_factor, e.design.blast_factor)),
                    _ => None,
                },
                projectile: match &*object {
                    SpaceObject::Projectile(p) => Some(p.clone()),
                    _ => None,
                },
            };
            (id.clone(), contact)
        })
        .collect()
}

/// Arc of the subject's hull touched by `other`, in the subject's local frame.
fn hit_arc(subject: &Contact, other: &Contact, distance: f64) -> Option<AngleRange> {
    let contained = distance + subject.radius <= other.radius || distance + other.radius <= subject.radius;
    if contained {
        return Some(AngleRange::full());
    }
    let (first, second) = circle_intersections(subject.position, subject.radius, other.position, other.radius)?;
    Some(AngleRange::new(
        angle_of(first - subject.position) - subject.angle,
        angle_of(second - subject.position) - subject.angle,
    ))
}
