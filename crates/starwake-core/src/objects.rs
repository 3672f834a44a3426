//! The space object model.
//!
//! `SpaceObject` is a closed sum type over every object kind. All variants
//! embed an `ObjectState` carrying the fields the world integrates.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::design::{ExplosionDesign, ProjectileDesign};
use crate::enums::*;
use crate::ids::ObjectId;
use crate::ship::Ship;

/// Fields shared by every space object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectState {
    pub id: ObjectId,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Heading in degrees.
    pub angle: f64,
    /// Degrees per second.
    pub turn_speed: f64,
    pub radius: f64,
    pub faction: Faction,
    /// Frozen objects neither move nor collide.
    pub frozen: bool,
    pub destroyed: bool,
    /// Hit points for non-ship objects. Ships use their armor instead.
    pub health: f64,
}

impl Default for ObjectState {
    fn default() -> Self {
        Self {
            id: ObjectId::default(),
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            angle: 0.0,
            turn_speed: 0.0,
            radius: 1.0,
            faction: Faction::None,
            frozen: false,
            destroyed: false,
            health: 100.0,
        }
    }
}

impl ObjectState {
    pub fn new(id: impl Into<ObjectId>, position: DVec2, radius: f64) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub state: ObjectState,
    pub projectile_type: ProjectileType,
    pub design: ProjectileDesign,
    pub seconds_to_live: f64,
    /// Homing target, if any.
    pub target_id: Option<ObjectId>,
    /// Object that fired it.
    pub source_id: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub state: ObjectState,
    pub design: ExplosionDesign,
    pub seconds_to_live: f64,
    pub source_id: Option<ObjectId>,
}

impl Explosion {
    /// Explosion of `design` centred at `position`, drifting with `velocity`.
    pub fn new(
        id: ObjectId,
        position: DVec2,
        velocity: DVec2,
        design: ExplosionDesign,
        source_id: Option<ObjectId>,
    ) -> Self {
        Self {
            state: ObjectState::new(id, position, design.radius).with_velocity(velocity),
            seconds_to_live: design.seconds_to_live,
            design,
            source_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub state: ObjectState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub state: ObjectState,
    pub title: String,
}

/// Every object the world can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SpaceObject {
    Ship(Box<Ship>),
    Projectile(Projectile),
    Explosion(Explosion),
    Asteroid(Asteroid),
    Waypoint(Waypoint),
}

impl SpaceObject {
    pub fn state(&self) -> &ObjectState {
        match self {
            SpaceObject::Ship(s) => &s.state,
            SpaceObject::Projectile(p) => &p.state,
            SpaceObject::Explosion(e) => &e.state,
            SpaceObject::Asteroid(a) => &a.state,
            SpaceObject::Waypoint(w) => &w.state,
        }
    }

    pub fn state_mut(&mut self) -> &mut ObjectState {
        match self {
            SpaceObject::Ship(s) => &mut s.state,
            SpaceObject::Projectile(p) => &mut p.state,
            SpaceObject::Explosion(e) => &mut e.state,
            SpaceObject::Asteroid(a) => &mut a.state,
            SpaceObject::Waypoint(w) => &mut w.state,
        }
    }

    pub fn kind(&self) -> SpaceObjectKind {
        match self {
            SpaceObject::Ship(_) => SpaceObjectKind::Ship,
            SpaceObject::Projectile(_) => SpaceObjectKind::Projectile,
            SpaceObject::Explosion(_) => SpaceObjectKind::Explosion,
            SpaceObject::Asteroid(_) => SpaceObjectKind::Asteroid,
            SpaceObject::Waypoint(_) => SpaceObjectKind::Waypoint,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.state().id
    }

    pub fn is_corporal(&self) -> bool {
        self.kind().is_corporal()
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match self {
            SpaceObject::Ship(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match self {
            SpaceObject::Ship(s) => Some(s),
            _ => None,
        }
    }

    pub fn summary(&self) -> ObjectSummary {
        let state = self.state();
        ObjectSummary {
            id: state.id.clone(),
            kind: self.kind(),
            position: state.position,
            velocity: state.velocity,
            angle: state.angle,
            radius: state.radius,
            faction: state.faction,
            frozen: state.frozen,
            destroyed: state.destroyed,
        }
    }
}

impl From<Ship> for SpaceObject {
    fn from(ship: Ship) -> Self {
        SpaceObject::Ship(Box::new(ship))
    }
}

impl From<Projectile> for SpaceObject {
    fn from(projectile: Projectile) -> Self {
        SpaceObject::Projectile(projectile)
    }
}

impl From<Explosion> for SpaceObject {
    fn from(explosion: Explosion) -> Self {
        SpaceObject::Explosion(explosion)
    }
}

impl From<Asteroid> for SpaceObject {
    fn from(asteroid: Asteroid) -> Self {
        SpaceObject::Asteroid(asteroid)
    }
}

impl From<Waypoint> for SpaceObject {
    fn from(waypoint: Waypoint) -> Self {
        SpaceObject::Waypoint(waypoint)
    }
}

/// Read-only copy of the fields other systems query about an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub kind: SpaceObjectKind,
    pub position: DVec2,
    pub velocity: DVec2,
    pub angle: f64,
    pub radius: f64,
    pub faction: Faction,
    pub frozen: bool,
    pub destroyed: bool,
}

impl ObjectSummary {
    pub fn is_corporal(&self) -> bool {
        self.kind.is_corporal()
    }
}
