//! Flight-control math for starwake.
//!
//! Helm-assist turns position and speed goals into normalized thruster and
//! rotation commands. Gunner-assist predicts where to aim and when a shell
//! would hit. No world dependency: everything operates on plain data.

pub mod gunner;
pub mod helm;

pub use starwake_core as core;

#[cfg(test)]
mod tests;
