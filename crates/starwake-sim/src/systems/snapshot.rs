//! Snapshot system: copies the live world into a `WorldSnapshot`.
//!
//! Read-only, it never modifies the world.

use starwake_core::state::{SimTime, WorldSnapshot};

use crate::world::SpatialWorld;

/// Build a complete snapshot of the world after a tick.
pub fn build_snapshot(world: &SpatialWorld, time: &SimTime) -> WorldSnapshot {
    WorldSnapshot {
        time: *time,
        objects: world.objects(),
        destroyed: world.destroyed_ids().len(),
    }
}
