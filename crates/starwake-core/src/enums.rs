//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Closed set of space object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpaceObjectKind {
    Ship,
    Projectile,
    Explosion,
    Asteroid,
    Waypoint,
}

impl SpaceObjectKind {
    /// Prefix used by generated ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            SpaceObjectKind::Ship => "ship-",
            SpaceObjectKind::Projectile => "proj-",
            SpaceObjectKind::Explosion => "boom-",
            SpaceObjectKind::Asteroid => "rock-",
            SpaceObjectKind::Waypoint => "wp-",
        }
    }

    /// Corporal kinds block line of sight and take part in collisions.
    pub fn is_corporal(self) -> bool {
        !matches!(self, SpaceObjectKind::Waypoint)
    }

    /// Solid kinds push each other apart on contact.
    pub fn is_solid(self) -> bool {
        matches!(self, SpaceObjectKind::Ship | SpaceObjectKind::Asteroid)
    }
}

/// Side an object belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    None,
    Gravitas,
    Raiders,
}

/// Projectile families a chain gun can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectileType {
    CannonShell,
    BlastCannonShell,
    Missile,
}

/// Docking state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DockingMode {
    #[default]
    Undocked,
    Docking,
    Docked,
    Undocking,
}

/// How the smart pilot interprets the maneuvering command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManeuveringMode {
    /// Raw boost/strafe passthrough.
    #[default]
    Direct,
    /// Hold target velocity plus a commanded offset.
    Target,
    /// Hold a commanded ship-local velocity.
    Velocity,
}

/// How the smart pilot interprets the rotation command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationMode {
    /// Raw rotation passthrough.
    #[default]
    Direct,
    /// Face the weapons target, offset by the commanded fraction of the max aim offset.
    Target,
}

/// How the chain gun derives shell time-to-live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellRangeMode {
    /// Normalized range command interpolated between min and max shell range.
    #[default]
    Direct,
    /// Detonate at the current distance to the weapons target.
    Target,
}

/// Hull areas used to decide which systems an armor breach exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipArea {
    Front,
    Rear,
}

impl ShipArea {
    pub const ALL: [ShipArea; 2] = [ShipArea::Front, ShipArea::Rear];
}

/// Subsystem kinds that can be damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemKind {
    Thruster,
    ChainGun,
    Reactor,
    Radar,
    SmartPilot,
    Magazine,
    Maneuvering,
    Docking,
}

/// Energy consumers tracked by the reactor telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyConsumer {
    Thrusters,
    Rotation,
    Afterburner,
    Warp,
    Other,
}
