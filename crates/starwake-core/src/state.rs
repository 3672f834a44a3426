//! World snapshot handed to the replication layer after each tick.

use serde::{Deserialize, Serialize};

use crate::objects::SpaceObject;

/// Simulation clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: u64,
    pub elapsed_secs: f64,
}

impl SimTime {
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Complete live state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    /// Live objects in id order.
    pub objects: Vec<SpaceObject>,
    /// Destroyed objects still awaiting garbage collection.
    pub destroyed: usize,
}
