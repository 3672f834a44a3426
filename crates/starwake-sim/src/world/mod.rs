//! SpatialWorld: canonical object storage, spatial index and tick integration.
//!
//! Every live object is one hecs entity carrying its `SpaceObject` plus two
//! side tables, `CollisionBody` and `FovState`. All three are spawned together
//! on insert and despawned together by the batched garbage collection.
//! Inbound changes are queued and drained at the start of `update`.

mod collision;
mod index;

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use glam::DVec2;
use hecs::{Entity, World};
use tracing::{debug, trace, warn};

use starwake_core::commands::{Damage, Order};
use starwake_core::config::SimConfig;
use starwake_core::constants::{HOMING_ALIGNMENT_TOLERANCE_DEG, MAX_RADAR_RANGE};
use starwake_core::enums::{Faction, SpaceObjectKind};
use starwake_core::ids::IdGenerator;
use starwake_core::math::{angle_of, direction, to_degrees_delta, to_positive_degrees};
use starwake_core::objects::{Explosion, ObjectSummary, Projectile, SpaceObject};
use starwake_core::ship::Ship;
use starwake_core::{ObjectId, Result, SimError};

use crate::fov::{self, FovCandidate, VisibleArc};

pub use index::{CellRange, SpatialHash};

/// Spatial-index side table.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    pub position: DVec2,
    pub radius: f64,
    /// Cells the body is registered in.
    pub cells: Option<CellRange>,
    pub attachment: Option<Attachment>,
}

/// A body carried along by another.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub target: ObjectId,
    pub offset: DVec2,
}

/// Field-of-view side table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FovState {
    pub dirty: bool,
    pub arcs: Vec<VisibleArc>,
}

/// First body hit by a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub id: ObjectId,
    pub point: DVec2,
    /// Fraction of the segment travelled, in `[0, 1]`.
    pub fraction: f64,
}

#[derive(Debug, Clone)]
enum WorldCommand {
    ChangeVelocity { id: ObjectId, delta: DVec2 },
    ChangeTurnSpeed { id: ObjectId, delta: f64 },
    Move { ids: Vec<ObjectId>, delta: DVec2 },
    FreezeToggle { ids: Vec<ObjectId> },
    Order { ids: Vec<ObjectId>, order: Order },
    RadarRange { id: ObjectId, range: f64 },
    Attach { id: ObjectId, target: ObjectId },
    Detach { id: ObjectId },
    Destroy { id: ObjectId },
}

pub struct SpatialWorld {
    config: SimConfig,
    objects: World,
    entities: BTreeMap<ObjectId, Entity>,
    index: SpatialHash,
    ids: IdGenerator,
    insert_queue: BTreeMap<ObjectId, SpaceObject>,
    commands: VecDeque<WorldCommand>,
    damage_queues: HashMap<ObjectId, Vec<Damage>>,
    order_queues: HashMap<ObjectId, Order>,
    gc_elapsed_secs: f64,
}

impl SpatialWorld {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            config: config.clone(),
            objects: World::new(),
            entities: BTreeMap::new(),
            index: SpatialHash::new(config.spatial_cell_size),
            ids: IdGenerator::default(),
            insert_queue: BTreeMap::new(),
            commands: VecDeque::new(),
            damage_queues: HashMap::new(),
            order_queues: HashMap::new(),
            gc_elapsed_secs: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fresh id for a new object of `kind`.
    pub fn next_id(&mut self, kind: SpaceObjectKind) -> ObjectId {
        loop {
            let id = self.ids.next_id(kind);
            if !self.entities.contains_key(&id) && !self.is_queued(&id) {
                return id;
            }
        }
    }

    // --- Inbound command surface ---

    /// Queue an object for insertion at the start of the next update.
    pub fn insert(&mut self, object: impl Into<SpaceObject>) -> Result<()> {
        let object = object.into();
        let state = object.state();
        if !(state.radius > 0.0) || !state.radius.is_finite() {
            return Err(SimError::InvalidRadius {
                id: state.id.clone(),
                radius: state.radius,
            });
        }
        if self.is_live(&state.id) || self.is_queued(&state.id) {
            return Err(SimError::DuplicateId(state.id.clone()));
        }
        self.insert_queue.insert(state.id.clone(), object);
        Ok(())
    }

    pub fn insert_bulk(&mut self, objects: impl IntoIterator<Item = SpaceObject>) -> Result<()> {
        for object in objects {
            self.insert(object)?;
        }
        Ok(())
    }

    pub fn change_velocity(&mut self, id: &ObjectId, delta: DVec2) {
        self.commands.push_back(WorldCommand::ChangeVelocity { id: id.clone(), delta });
    }

    pub fn change_turn_speed(&mut self, id: &ObjectId, delta: f64) {
        self.commands.push_back(WorldCommand::ChangeTurnSpeed { id: id.clone(), delta });
    }

    pub fn move_objects(&mut self, ids: &[ObjectId], delta: DVec2) {
        self.commands.push_back(WorldCommand::Move {
            ids: ids.to_vec(),
            delta,
        });
    }

    pub fn queue_order(&mut self, ids: &[ObjectId], order: Order) {
        self.commands.push_back(WorldCommand::Order {
            ids: ids.to_vec(),
            order,
        });
    }

    pub fn freeze_toggle(&mut self, ids: &[ObjectId]) {
        self.commands.push_back(WorldCommand::FreezeToggle { ids: ids.to_vec() });
    }

    /// Queue a new basic radar range, clamped to `[0, MAX_RADAR_RANGE]`.
    pub fn change_ship_radar_range(&mut self, id: &ObjectId, range: f64) -> Result<()> {
        if !range.is_finite() {
            return Err(SimError::InvalidRange { id: id.clone(), range });
        }
        if !self.is_live(id) && !self.is_queued(id) {
            return Err(SimError::UnknownObject(id.clone()));
        }
        self.commands.push_back(WorldCommand::RadarRange {
            id: id.clone(),
            range: range.clamp(0.0, MAX_RADAR_RANGE),
        });
        Ok(())
    }

    /// Carry `id` along with `target`, keeping their current offset.
    pub fn attach(&mut self, id: &ObjectId, target: &ObjectId) {
        self.commands.push_back(WorldCommand::Attach {
            id: id.clone(),
            target: target.clone(),
        });
    }

    pub fn detach(&mut self, id: &ObjectId) {
        self.commands.push_back(WorldCommand::Detach { id: id.clone() });
    }

    /// Mark an object destroyed. It stays in storage until the next GC sweep.
    pub fn destroy(&mut self, id: &ObjectId) {
        self.commands.push_back(WorldCommand::Destroy { id: id.clone() });
    }

    /// Queue deferred damage for a ship's next update.
    pub fn queue_damage(&mut self, id: &ObjectId, damage: Damage) {
        self.damage_queues.entry(id.clone()).or_default().push(damage);
    }

    // --- Outbound query surface ---

    /// Drain one ship's pending damage.
    pub fn resolve_object_damage(&mut self, id: &ObjectId) -> Vec<Damage> {
        self.damage_queues.remove(id).unwrap_or_default()
    }

    /// Drain one ship's pending order.
    pub fn resolve_object_order(&mut self, id: &ObjectId) -> Option<Order> {
        self.order_queues.remove(id)
    }

    pub fn summary(&self, id: &ObjectId) -> Option<ObjectSummary> {
        let entity = *self.entities.get(id)?;
        let object = self.objects.get::<&SpaceObject>(entity).ok()?;
        Some(object.summary())
    }

    /// Copy of a ship's full state.
    pub fn ship(&self, id: &ObjectId) -> Option<Ship> {
        let entity = *self.entities.get(id)?;
        let object = self.objects.get::<&SpaceObject>(entity).ok()?;
        object.as_ship().cloned()
    }

    /// Write back a ship updated by its managers.
    pub fn store_ship(&mut self, ship: Ship) {
        match self.object_mut(&ship.state.id).and_then(SpaceObject::as_ship_mut) {
            Some(stored) => *stored = ship,
            None => warn!(id = %ship.state.id, "store_ship: no such ship"),
        }
    }

    pub fn is_live(&self, id: &ObjectId) -> bool {
        self.summary(id).is_some_and(|s| !s.destroyed)
    }

    /// Live ship ids in id order.
    pub fn ship_ids(&self) -> Vec<ObjectId> {
        self.live_objects()
            .filter(|(_, o)| o.kind() == SpaceObjectKind::Ship)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Clones of every live object in id order.
    pub fn objects(&self) -> Vec<SpaceObject> {
        self.live_objects().map(|(_, o)| (*o).clone()).collect()
    }

    /// Ids of destroyed objects still awaiting GC.
    pub fn destroyed_ids(&self) -> Vec<ObjectId> {
        self.entities
            .iter()
            .filter(|(_, entity)| {
                self.objects
                    .get::<&SpaceObject>(**entity)
                    .map(|o| o.state().destroyed)
                    .unwrap_or(false)
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn live_objects(&self) -> impl Iterator<Item = (&ObjectId, hecs::Ref<'_, SpaceObject>)> + '_ {
        self.entities.iter().filter_map(|(id, &entity)| {
            let object = self.objects.get::<&SpaceObject>(entity).ok()?;
            (!object.state().destroyed).then_some((id, object))
        })
    }

    /// Live objects whose bodies intersect the circle, in id order.
    pub fn query_area(&self, center: DVec2, radius: f64) -> Vec<ObjectSummary> {
        self.index
            .potentials(center, radius)
            .iter()
            .filter_map(|id| self.summary(id))
            .filter(|s| !s.destroyed && s.position.distance(center) <= radius + s.radius)
            .collect()
    }

    /// First body (by distance along the segment) accepted by `filter`.
    pub fn raycast(&self, from: DVec2, to: DVec2, filter: impl Fn(&ObjectSummary) -> bool) -> Option<RayHit> {
        let segment = to - from;
        let length_sq = segment.length_squared();
        let mut best: Option<RayHit> = None;
        for id in self.index.potentials_along(from, to) {
            let Some(summary) = self.summary(&id) else {
                continue;
            };
            if summary.destroyed || !filter(&summary) {
                continue;
            }
            let Some(fraction) = ray_circle(from, segment, length_sq, summary.position, summary.radius) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| fraction < b.fraction) {
                best = Some(RayHit {
                    id,
                    point: from + segment * fraction,
                    fraction,
                });
            }
        }
        best
    }

    /// Visible arcs around `id`, recomputed if the cache is dirty.
    pub fn field_of_view(&mut self, id: &ObjectId) -> Option<Vec<VisibleArc>> {
        let entity = *self.entities.get(id)?;
        match self.objects.get::<&FovState>(entity) {
            Ok(fov) if !fov.dirty => return Some(fov.arcs.clone()),
            Ok(_) => {}
            Err(_) => {
                warn!(id = %id, "live object without field-of-view state");
                return None;
            }
        }
        let (origin, range) = {
            let object = self.objects.get::<&SpaceObject>(entity).ok()?;
            let range = object.as_ship().map_or(0.0, |ship| ship.radar.effective_range());
            (object.state().position, range)
        };
        let candidates: Vec<FovCandidate> = self
            .query_area(origin, range)
            .into_iter()
            .filter(|s| s.is_corporal() && &s.id != id)
            .map(|s| FovCandidate {
                id: s.id,
                position: s.position,
                radius: s.radius,
            })
            .collect();
        let arcs = fov::compute_arcs(origin, range, &candidates);
        if let Ok(mut fov) = self.objects.get::<&mut FovState>(entity) {
            fov.arcs = arcs.clone();
            fov.dirty = false;
        }
        Some(arcs)
    }

    /// Everything a faction can see: its own members plus whatever their
    /// fields of view attribute arcs to.
    pub fn faction_visible_objects(&mut self, faction: Faction) -> BTreeSet<ObjectId> {
        let members: Vec<ObjectId> = self
            .live_objects()
            .filter(|(_, o)| o.state().faction == faction)
            .map(|(id, _)| id.clone())
            .collect();
        let mut visible: BTreeSet<ObjectId> = members.iter().cloned().collect();
        for member in &members {
            if let Some(arcs) = self.field_of_view(member) {
                visible.extend(arcs.into_iter().filter_map(|arc| arc.object));
            }
        }
        visible
    }

    pub fn attached_to(&self, id: &ObjectId) -> Option<ObjectId> {
        let entity = *self.entities.get(id)?;
        let body = self.objects.get::<&CollisionBody>(entity).ok()?;
        body.attachment.as_ref().map(|a| a.target.clone())
    }

    // --- Tick ---

    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        self.drain_inserts();
        self.drain_commands();
        self.grow_explosions(dt);
        self.age_timed_objects(dt);
        self.steer_homing(dt);
        self.drop_stale_side_tables();
        self.hold_frozen();
        self.integrate(dt);
        self.mark_fov_dirty();
        self.sync_bodies();
        collision::resolve(self, dt);
        self.gc_elapsed_secs += dt;
        if self.gc_elapsed_secs >= self.config.gc_interval_secs {
            self.gc_elapsed_secs = 0.0;
            self.gc();
        }
    }

    /// Remove destroyed objects and everything keyed by them.
    pub fn gc(&mut self) {
        let doomed = self.destroyed_ids();
        for id in &doomed {
            let Some(entity) = self.entities.remove(id) else {
                continue;
            };
            if let Ok(mut body) = self.objects.get::<&mut CollisionBody>(entity) {
                self.index.remove(id, &mut body);
            }
            let _ = self.objects.despawn(entity);
            self.damage_queues.remove(id);
            self.order_queues.remove(id);
        }
        if !doomed.is_empty() {
            debug!(count = doomed.len(), "collected destroyed objects");
        }
    }

    fn is_queued(&self, id: &ObjectId) -> bool {
        self.insert_queue.contains_key(id)
    }

    fn object_mut(&mut self, id: &ObjectId) -> Option<&mut SpaceObject> {
        let entity = *self.entities.get(id)?;
        self.objects.query_one_mut::<&mut SpaceObject>(entity).ok()
    }

    fn drain_inserts(&mut self) {
        if self.insert_queue.is_empty() {
            return;
        }
        if self.insert_queue.keys().any(|id| self.entities.contains_key(id)) {
            self.gc();
        }
        for (id, object) in std::mem::take(&mut self.insert_queue) {
            if self.entities.contains_key(&id) {
                warn!(id = %id, "insert of an id that is still live, skipped");
                continue;
            }
            let state = object.state();
            let mut body = CollisionBody {
                position: state.position,
                radius: state.radius,
                cells: None,
                attachment: None,
            };
            self.index.insert(&id, &mut body);
            let fov = FovState {
                dirty: true,
                arcs: Vec::new(),
            };
            let entity = self.objects.spawn((object, body, fov));
            trace!(id = %id, "inserted");
            self.entities.insert(id, entity);
        }
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                WorldCommand::ChangeVelocity { id, delta } => match self.object_mut(&id) {
                    Some(object) => object.state_mut().velocity += delta,
                    None => warn!(id = %id, "velocity change for unknown object"),
                },
                WorldCommand::ChangeTurnSpeed { id, delta } => match self.object_mut(&id) {
                    Some(object) => object.state_mut().turn_speed += delta,
                    None => warn!(id = %id, "turn speed change for unknown object"),
                },
                WorldCommand::Move { ids, delta } => {
                    for id in ids {
                        match self.object_mut(&id) {
                            Some(object) => object.state_mut().position += delta,
                            None => warn!(id = %id, "move for unknown object"),
                        }
                    }
                }
                WorldCommand::FreezeToggle { ids } => {
                    for id in ids {
                        if let Some(object) = self.object_mut(&id) {
                            let state = object.state_mut();
                            state.frozen = !state.frozen;
                        }
                    }
                }
                WorldCommand::Order { ids, order } => {
                    for id in ids {
                        if self.is_live(&id) {
                            self.order_queues.insert(id, order.clone());
                        } else {
                            warn!(id = %id, "order for unknown object");
                        }
                    }
                }
                WorldCommand::RadarRange { id, range } => {
                    match self.object_mut(&id).and_then(SpaceObject::as_ship_mut) {
                        Some(ship) => ship.radar.basic_range = range.clamp(0.0, MAX_RADAR_RANGE),
                        None => warn!(id = %id, "radar range change for a non-ship"),
                    }
                }
                WorldCommand::Attach { id, target } => self.apply_attach(&id, &target),
                WorldCommand::Detach { id } => {
                    if let Some(&entity) = self.entities.get(&id) {
                        if let Ok(body) = self.objects.query_one_mut::<&mut CollisionBody>(entity) {
                            body.attachment = None;
                        }
                    }
                }
                WorldCommand::Destroy { id } => match self.object_mut(&id) {
                    Some(object) => object.state_mut().destroyed = true,
                    None => warn!(id = %id, "destroy for unknown object"),
                },
            }
        }
    }

    fn apply_attach(&mut self, id: &ObjectId, target: &ObjectId) {
        let (Some(own), Some(other)) = (self.summary(id), self.summary(target)) else {
            warn!(id = %id, target = %target, "attach with unknown object");
            return;
        };
        if id == target {
            warn!(id = %id, "object cannot attach to itself");
            return;
        }
        let Some(&entity) = self.entities.get(id) else {
            return;
        };
        if let Ok(body) = self.objects.query_one_mut::<&mut CollisionBody>(entity) {
            body.attachment = Some(Attachment {
                target: target.clone(),
                offset: own.position - other.position,
            });
        }
    }

    fn grow_explosions(&mut self, dt: f64) {
        for (_, object) in self.objects.query_mut::<&mut SpaceObject>() {
            if let SpaceObject::Explosion(explosion) = object {
                if !explosion.state.destroyed {
                    explosion.state.radius += explosion.design.expansion_speed * dt;
                }
            }
        }
    }

    fn age_timed_objects(&mut self, dt: f64) {
        let ids: Vec<ObjectId> = self.entities.keys().cloned().collect();
        let mut detonations = Vec::new();
        for id in ids {
            let Some(object) = self.object_mut(&id) else {
                continue;
            };
            match object {
                SpaceObject::Projectile(projectile) if !projectile.state.destroyed => {
                    projectile.seconds_to_live -= dt;
                    if projectile.seconds_to_live <= 0.0 {
                        projectile.state.destroyed = true;
                        detonations.push(projectile.clone());
                    }
                }
                SpaceObject::Explosion(explosion) if !explosion.state.destroyed => {
                    explosion.seconds_to_live -= dt;
                    if explosion.seconds_to_live <= 0.0 {
                        explosion.state.destroyed = true;
                    }
                }
                _ => {}
            }
        }
        for projectile in detonations {
            self.spawn_explosion(
                projectile.state.position,
                projectile.state.velocity,
                &projectile,
            );
        }
    }

    /// Queue the explosion of `projectile` at `position`.
    pub(crate) fn spawn_explosion(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        projectile: &Projectile,
    ) {
        let id = self.next_id(SpaceObjectKind::Explosion);
        let mut explosion = Explosion::new(
            id,
            position,
            velocity,
            projectile.design.explosion.clone(),
            projectile.source_id.clone(),
        );
        explosion.state.faction = projectile.state.faction;
        if let Err(err) = self.insert(explosion) {
            warn!(error = %err, "explosion spawn rejected");
        }
    }

    fn steer_homing(&mut self, dt: f64) {
        let targets: HashMap<ObjectId, DVec2> = self
            .live_objects()
            .map(|(id, o)| (id.clone(), o.state().position))
            .collect();
        for (_, object) in self.objects.query_mut::<&mut SpaceObject>() {
            let SpaceObject::Projectile(projectile) = object else {
                continue;
            };
            let Some(homing) = projectile.design.homing.as_ref() else {
                continue;
            };
            if projectile.state.destroyed {
                continue;
            }
            let Some(target) = projectile.target_id.as_ref().and_then(|t| targets.get(t)) else {
                continue;
            };
            let state = &mut projectile.state;
            let bearing = angle_of(*target - state.position);
            let max_turn = homing.rotation_capacity * dt;
            let turn = to_degrees_delta(bearing - state.angle).clamp(-max_turn, max_turn);
            state.angle = to_positive_degrees(state.angle + turn);
            state.turn_speed = 0.0;

            let speed = state.velocity.length();
            let misaligned = speed <= f64::EPSILON
                || to_degrees_delta(angle_of(state.velocity) - state.angle).abs() > HOMING_ALIGNMENT_TOLERANCE_DEG;
            if misaligned || speed < homing.max_speed {
                state.velocity += direction(state.angle) * homing.velocity_capacity * dt;
            }
            let speed = state.velocity.length();
            if speed > homing.max_speed {
                state.velocity *= homing.max_speed / speed;
            }
        }
    }

    fn drop_stale_side_tables(&mut self) {
        let mut stale = Vec::new();
        for (_, (object, body, fov)) in self
            .objects
            .query_mut::<(&SpaceObject, &mut CollisionBody, &mut FovState)>()
        {
            if object.state().destroyed {
                body.attachment = None;
                fov.arcs.clear();
                stale.push(object.id().clone());
            }
        }
        for id in stale {
            self.damage_queues.remove(&id);
            self.order_queues.remove(&id);
        }
    }

    fn hold_frozen(&mut self) {
        for (_, object) in self.objects.query_mut::<&mut SpaceObject>() {
            let state = object.state_mut();
            if state.frozen {
                state.velocity = DVec2::ZERO;
                state.turn_speed = 0.0;
            }
        }
    }

    fn integrate(&mut self, dt: f64) {
        // Projectiles are clamped to the first solid along their path so fast
        // shells cannot tunnel through a hull in one step.
        let mut clamps: HashMap<ObjectId, DVec2> = HashMap::new();
        for (id, object) in self.live_objects() {
            if let SpaceObject::Projectile(projectile) = &*object {
                let from = projectile.state.position;
                let to = from + projectile.state.velocity * dt;
                let hit = self.raycast(from, to, |s| s.kind.is_solid() && &s.id != id);
                if let Some(hit) = hit {
                    clamps.insert(id.clone(), hit.point);
                }
            }
        }

        for (_, object) in self.objects.query_mut::<&mut SpaceObject>() {
            let state = object.state_mut();
            if state.destroyed || state.frozen {
                continue;
            }
            state.position = match clamps.get(&state.id) {
                Some(point) => *point,
                None => state.position + state.velocity * dt,
            };
            state.angle = to_positive_degrees(state.angle + state.turn_speed * dt);
        }

        self.carry_attached();
    }

    fn carry_attached(&mut self) {
        let attached: Vec<(ObjectId, Attachment)> = self
            .objects
            .query::<(&SpaceObject, &CollisionBody)>()
            .iter()
            .filter_map(|(_, (o, b))| b.attachment.clone().map(|a| (o.id().clone(), a)))
            .collect();
        for (id, attachment) in attached {
            match self.summary(&attachment.target).filter(|t| !t.destroyed) {
                Some(target) => {
                    if let Some(object) = self.object_mut(&id) {
                        let state = object.state_mut();
                        state.position = target.position + attachment.offset;
                        state.velocity = target.velocity;
                    }
                }
                None => {
                    warn!(id = %id, target = %attachment.target, "attachment target lost");
                    self.detach(&id);
                }
            }
        }
    }

    fn mark_fov_dirty(&mut self) {
        for (_, fov) in self.objects.query_mut::<&mut FovState>() {
            fov.dirty = true;
        }
    }

    fn sync_bodies(&mut self) {
        for (_, (object, body)) in self.objects.query_mut::<(&SpaceObject, &mut CollisionBody)>() {
            let state = object.state();
            body.position = state.position;
            body.radius = state.radius;
            self.index.update(&state.id, body);
        }
    }

    /// Apply accumulated collision deltas and refresh the index.
    fn apply_deltas(&mut self, deltas: BTreeMap<ObjectId, (DVec2, DVec2)>) {
        for (id, (dp, dv)) in deltas {
            if let Some(object) = self.object_mut(&id) {
                let state = object.state_mut();
                state.position += dp;
                state.velocity += dv;
            }
        }
        self.sync_bodies();
    }
}

/// Fraction along `segment` where it first enters the circle, if it does.
fn ray_circle(from: DVec2, segment: DVec2, length_sq: f64, center: DVec2, radius: f64) -> Option<f64> {
    let to_center = from - center;
    let c = to_center.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    if length_sq <= f64::EPSILON {
        return None;
    }
    let b = to_center.dot(segment);
    let discriminant = b * b - length_sq * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / length_sq;
    (0.0..=1.0).contains(&t).then_some(t)
}
