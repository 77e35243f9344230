//! Actor definitions.

use serde::{Deserialize, Serialize};

use super::ActorId;

/// A character known to the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Full display name, e.g. "Ada 'Pickles' Lovelace".
    pub name: String,
    /// Short name used in conversation, e.g. "Pickles".
    pub short_name: Option<String>,
}

impl Actor {
    /// Create a new actor with the given full name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            short_name: None,
        }
    }

    /// Set the short name.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// The short name if available, otherwise the full name.
    ///
    /// Returns `None` when the actor has no usable name at all.
    pub fn display_short_name(&self) -> Option<&str> {
        self.short_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.name.as_str()).filter(|s| !s.is_empty()))
    }
}
