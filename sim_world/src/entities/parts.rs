//! Typed sub-parts of a narrative task.
//!
//! A task is decomposed into an ordered list of sub-parts. Only some of them
//! carry a spatial reference; those implement [`LocationBearing`]. Callers
//! dispatch through [`SubPart::location`] instead of probing fields.

use serde::{Deserialize, Serialize};

use super::{ActorId, WorldObjectId};
use crate::mechanics::SubPartKind;
use crate::world_state::RegionId;

/// A sub-part that points at a place in the world.
pub trait LocationBearing {
    /// Region the sub-part refers to directly, if any.
    fn region_ref(&self) -> Option<RegionId>;

    /// World object (settlement, site) the sub-part refers to, if any.
    fn parent_ref(&self) -> Option<WorldObjectId>;
}

/// Spatial reference shared by location-bearing sub-parts.
///
/// Both fields are optional because host versions differ in which of them
/// they populate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    #[serde(default)]
    pub region: Option<RegionId>,
    #[serde(default)]
    pub parent: Option<WorldObjectId>,
}

impl PlaceRef {
    pub fn region(region: RegionId) -> Self {
        Self {
            region: Some(region),
            parent: None,
        }
    }

    pub fn parent(parent: WorldObjectId) -> Self {
        Self {
            region: None,
            parent: Some(parent),
        }
    }
}

impl LocationBearing for PlaceRef {
    fn region_ref(&self) -> Option<RegionId> {
        self.region
    }

    fn parent_ref(&self) -> Option<WorldObjectId> {
        self.parent
    }
}

/// One step or effect of a narrative task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubPart {
    /// Actors arriving at, staying at, or leaving a place.
    ActorPresence {
        #[serde(default)]
        actor: Option<ActorId>,
        #[serde(default)]
        actors: Vec<ActorId>,
        #[serde(default)]
        place: PlaceRef,
    },

    /// A site or camp spawned or tracked by the task.
    Site { place: PlaceRef },

    /// An effect applied to a region (condition, raid, siege).
    RegionEffect { place: PlaceRef },

    /// A countdown with no spatial meaning.
    Timer {
        #[serde(default)]
        duration_ticks: Option<i64>,
    },

    /// Rewards delivered at the end of the task.
    RewardDelivery {
        #[serde(default)]
        place: PlaceRef,
    },

    /// Items or actors dropped off somewhere (drop pods, shuttles).
    DropOff {
        #[serde(default)]
        place: PlaceRef,
    },

    /// A requirement the player must satisfy to accept the task.
    AcceptanceRequirement {
        #[serde(default)]
        place: PlaceRef,
    },

    /// A letter or message sent to the player.
    Notification {
        #[serde(default)]
        actor: Option<ActorId>,
    },

    /// A branch offered to the player.
    Choice {
        #[serde(default)]
        actors: Vec<ActorId>,
    },

    /// A sub-part the adapter could not classify.
    Other { type_name: String },
}

impl SubPart {
    /// The classification used by the exclusion list.
    pub fn kind(&self) -> SubPartKind {
        match self {
            SubPart::ActorPresence { .. } => SubPartKind::ActorPresence,
            SubPart::Site { .. } => SubPartKind::Site,
            SubPart::RegionEffect { .. } => SubPartKind::RegionEffect,
            SubPart::Timer { .. } => SubPartKind::Timer,
            SubPart::RewardDelivery { .. } => SubPartKind::RewardDelivery,
            SubPart::DropOff { .. } => SubPartKind::DropOff,
            SubPart::AcceptanceRequirement { .. } => SubPartKind::AcceptanceRequirement,
            SubPart::Notification { .. } => SubPartKind::Notification,
            SubPart::Choice { .. } => SubPartKind::Choice,
            SubPart::Other { .. } => SubPartKind::Other,
        }
    }

    /// The spatial reference carried by this sub-part, if its variant has one.
    pub fn location(&self) -> Option<&dyn LocationBearing> {
        match self {
            SubPart::ActorPresence { place, .. }
            | SubPart::Site { place }
            | SubPart::RegionEffect { place }
            | SubPart::RewardDelivery { place }
            | SubPart::DropOff { place }
            | SubPart::AcceptanceRequirement { place } => Some(place),
            SubPart::Timer { .. }
            | SubPart::Notification { .. }
            | SubPart::Choice { .. }
            | SubPart::Other { .. } => None,
        }
    }

    /// Actors directly referenced by this sub-part, single field first.
    pub fn actors(&self) -> Vec<ActorId> {
        match self {
            SubPart::ActorPresence { actor, actors, .. } => {
                actor.iter().chain(actors.iter()).copied().collect()
            }
            SubPart::Notification { actor } => actor.iter().copied().collect(),
            SubPart::Choice { actors } => actors.clone(),
            _ => Vec::new(),
        }
    }
}
