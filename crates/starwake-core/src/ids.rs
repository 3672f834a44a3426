//! Object identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::SpaceObjectKind;

/// Globally unique object id. Stable for the object's whole lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Monotonic id source. One counter is shared by every object kind so
/// generated ids never collide across kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self, kind: SpaceObjectKind) -> ObjectId {
        self.next += 1;
        ObjectId(format!("{}{}", kind.id_prefix(), self.next))
    }
}
