//! Narrative task definitions.

use serde::{Deserialize, Serialize};

use super::{ActorId, SubPart, TileId, WorldObjectId};
use crate::mechanics::TaskState;
use crate::world_state::{RegionId, TaskId};

/// A declared target of a task: where the host's "look at" button points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTarget {
    #[serde(default)]
    pub region: Option<RegionId>,
    #[serde(default)]
    pub parent: Option<WorldObjectId>,
    #[serde(default)]
    pub tile: Option<TileId>,
}

impl TaskTarget {
    pub fn region(region: RegionId) -> Self {
        Self {
            region: Some(region),
            ..Default::default()
        }
    }

    pub fn parent(parent: WorldObjectId) -> Self {
        Self {
            parent: Some(parent),
            ..Default::default()
        }
    }

    pub fn tile(tile: TileId) -> Self {
        Self {
            tile: Some(tile),
            ..Default::default()
        }
    }
}

/// One live instance of a multi-step scripted objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeTask {
    pub id: TaskId,

    /// Root type id shared by every instance of this task type.
    pub type_id: Option<String>,

    /// Generated instance name, e.g. "Pickles the Destitute".
    pub name: Option<String>,

    /// Resolved, generated description text.
    pub description: Option<String>,

    pub state: TaskState,

    /// Hidden tasks are bookkeeping and never shown to the player.
    #[serde(default)]
    pub hidden: bool,

    /// Special root types are global and never tied to a region.
    #[serde(default)]
    pub root_special: bool,

    /// Tick at which the task was accepted.
    #[serde(default)]
    pub accepted_tick: Option<i64>,

    #[serde(default)]
    pub targets: Vec<TaskTarget>,

    #[serde(default)]
    pub parts: Vec<SubPart>,
}

impl NarrativeTask {
    /// Create a new ongoing task of the given root type.
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            type_id: Some(type_id.into()),
            name: None,
            description: None,
            state: TaskState::Ongoing,
            hidden: false,
            root_special: false,
            accepted_tick: None,
            targets: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    pub fn with_accepted_tick(mut self, tick: i64) -> Self {
        self.accepted_tick = Some(tick);
        self
    }

    pub fn with_target(mut self, target: TaskTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_part(mut self, part: SubPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Check if the task is in progress.
    pub fn is_ongoing(&self) -> bool {
        self.state == TaskState::Ongoing
    }

    /// Short title: the name, else the first line of the description, else "Task".
    pub fn label(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) => match desc.find('\n') {
                Some(nl) if nl > 0 => desc[..nl].to_string(),
                _ => desc.to_string(),
            },
            None => "Task".to_string(),
        }
    }

    /// Actors referenced by any sub-part, de-duplicated in first-seen order.
    pub fn key_actors(&self) -> Vec<ActorId> {
        let mut actors: Vec<ActorId> = Vec::new();
        for part in &self.parts {
            for actor in part.actors() {
                if !actors.contains(&actor) {
                    actors.push(actor);
                }
            }
        }
        actors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlaceRef;

    #[test]
    fn test_label_fallbacks() {
        let named = NarrativeTask::new("Hospitality_Refugee").with_name("Pickles the Destitute");
        assert_eq!(named.label(), "Pickles the Destitute");

        let described = NarrativeTask::new("Hospitality_Refugee")
            .with_description("A refugee asks for help.\nMore text follows.");
        assert_eq!(described.label(), "A refugee asks for help.");

        let bare = NarrativeTask::new("Hospitality_Refugee");
        assert_eq!(bare.label(), "Task");
    }

    #[test]
    fn test_key_actors_deduplicated() {
        let ada = ActorId::new();
        let bob = ActorId::new();

        let task = NarrativeTask::new("Hospitality_Refugee")
            .with_part(SubPart::ActorPresence {
                actor: Some(ada),
                actors: vec![bob, ada],
                place: PlaceRef::default(),
            })
            .with_part(SubPart::Choice { actors: vec![bob] });

        assert_eq!(task.key_actors(), vec![ada, bob]);
    }

    #[test]
    fn test_ongoing_state() {
        let task = NarrativeTask::new("X");
        assert!(task.is_ongoing());

        let ended = NarrativeTask::new("X").with_state(TaskState::Ended);
        assert!(!ended.is_ongoing());
    }
}
