//! Simulation-wide configuration.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SimError};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds between batched removals of destroyed objects.
    pub gc_interval_secs: f64,
    /// Damage per unit of overlap for solid-vs-solid contact.
    pub collision_damage: f64,
    /// Separating velocity per unit of overlap, per second.
    pub collision_elasticity: f64,
    /// Spatial hash cell edge length.
    pub spatial_cell_size: f64,
    /// How long a die roll stays cached for the same key.
    pub die_roll_interval_secs: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            gc_interval_secs: DEFAULT_GC_INTERVAL_SECS,
            collision_damage: DEFAULT_COLLISION_DAMAGE,
            collision_elasticity: DEFAULT_COLLISION_ELASTICITY,
            spatial_cell_size: DEFAULT_SPATIAL_CELL_SIZE,
            die_roll_interval_secs: DEFAULT_DIE_ROLL_INTERVAL_SECS,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gc_interval_secs > 0.0) {
            return Err(SimError::Config(format!(
                "gc_interval_secs must be positive, got {}",
                self.gc_interval_secs
            )));
        }
        if !(self.spatial_cell_size > 0.0) {
            return Err(SimError::Config(format!(
                "spatial_cell_size must be positive, got {}",
                self.spatial_cell_size
            )));
        }
        if self.collision_damage < 0.0 || self.collision_elasticity < 0.0 {
            return Err(SimError::Config(
                "collision parameters must not be negative".into(),
            ));
        }
        if self.die_roll_interval_secs < 0.0 {
            return Err(SimError::Config(
                "die_roll_interval_secs must not be negative".into(),
            ));
        }
        Ok(())
    }
}
