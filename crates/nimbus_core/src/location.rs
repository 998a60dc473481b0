//! Provider/region location handle.

use serde::{Deserialize, Serialize};

/// Opaque provider/region handle attached to container entries.
///
/// Backends that store everything in one place (such as the local
/// filesystem) report no location at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Backend-scoped identifier
    pub id: String,
    /// Human-readable description
    pub description: String,
}

impl Location {
    /// Create a location handle.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
