//! Error types for the starwake simulation.

use thiserror::Error;

use crate::ids::ObjectId;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised at the fallible edges of the simulation: inserts, radar
/// range changes, designs and config.
///
/// The tick path itself never fails: violations there are logged and skipped.
#[derive(Debug, Error)]
pub enum SimError {
    /// An object with this id is already live or queued for insertion.
    #[error("Duplicate object id: {0}")]
    DuplicateId(ObjectId),

    /// No live object carries this id.
    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),

    /// A range parameter must be finite.
    #[error("Invalid range {range} for object {id}")]
    InvalidRange {
        /// Target object.
        id: ObjectId,
        /// Offending range.
        range: f64,
    },

    /// Object radius must be positive and finite.
    #[error("Invalid radius {radius} for object {id}")]
    InvalidRadius {
        /// Offending object.
        id: ObjectId,
        /// Offending radius.
        radius: f64,
    },

    /// A design table failed validation.
    #[error("Invalid design '{design}': {message}")]
    InvalidDesign {
        /// Design name.
        design: String,
        /// What is wrong with it.
        message: String,
    },

    /// Simulation config failed validation.
    #[error("Invalid config: {0}")]
    Config(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File access failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
