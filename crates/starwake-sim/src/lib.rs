//! Simulation runtime for starwake.
//!
//! `SpatialWorld` owns every space object in a hecs world plus a spatial
//! hash, and advances physics and collisions. The per-ship managers in
//! `systems` run ahead of it each tick. `SimulationEngine` drives both in a
//! fixed order and produces `WorldSnapshot`s.

pub mod die;
pub mod engine;
pub mod fov;
pub mod systems;
pub mod world;

pub use engine::SimulationEngine;
pub use starwake_core as core;
pub use world::SpatialWorld;

#[cfg(test)]
mod tests;
