//! Per-ship managers run each tick before the world update.
//!
//! Managers are free functions over one `&mut Ship`. They read the world
//! through its query surface and change it only through queued commands.

pub mod automation;
pub mod chain_gun;
pub mod damage;
pub mod docking;
pub mod energy;
pub mod movement;
pub mod snapshot;
