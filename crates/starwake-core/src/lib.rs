//! Core types and definitions for the starwake simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! object ids, the space object model, ship subsystems and their design
//! tables, commands, orders, damage records, constants and errors.
//! It has no dependency on the simulation runtime.

pub mod commands;
pub mod config;
pub mod constants;
pub mod defects;
pub mod design;
pub mod enums;
pub mod error;
pub mod ids;
pub mod math;
pub mod objects;
pub mod ship;
pub mod state;
pub mod subsystems;

pub use error::{Result, SimError};
pub use ids::ObjectId;
