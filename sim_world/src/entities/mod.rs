//! Entity definitions for the simulation world.

mod actor;
mod parts;
mod task;

pub use actor::*;
pub use parts::*;
pub use task::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors (characters, animals, visitors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an actor ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty actor ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for world objects that own regions (settlements, sites, camps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldObjectId(pub Uuid);

impl WorldObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorldObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorldObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tile coordinate on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId(pub i32);

impl TileId {
    /// Tiles below zero are the host's "invalid tile" marker.
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}
