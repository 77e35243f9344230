//! World state - the in-memory picture of one loaded simulation.

mod host;

pub use host::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::entities::{Actor, ActorId, NarrativeTask, TileId, WorldObjectId};
use crate::mechanics::AlertClass;
use crate::rules::RulePack;

/// Unique identifier for regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub Uuid);

impl RegionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for narrative task instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A feature of an away site, e.g. "ancient mercenaries".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteFeature {
    pub type_id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl SiteFeature {
    pub fn new(type_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A spatial simulation area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    /// Home bases never get "current location" entries.
    pub is_home: bool,
    /// World object that owns this region, if any.
    #[serde(default)]
    pub parent: Option<WorldObjectId>,
    #[serde(default)]
    pub tile: Option<TileId>,
    #[serde(default)]
    pub site_features: Vec<SiteFeature>,
}

impl Region {
    /// Create a home region.
    pub fn home(name: impl Into<String>) -> Self {
        Self {
            id: RegionId::new(),
            name: name.into(),
            is_home: true,
            parent: None,
            tile: None,
            site_features: Vec::new(),
        }
    }

    /// Create an away (expedition) region.
    pub fn away(name: impl Into<String>) -> Self {
        Self {
            is_home: false,
            ..Self::home(name)
        }
    }

    pub fn with_parent(mut self, parent: WorldObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_tile(mut self, tile: TileId) -> Self {
        self.tile = Some(tile);
        self
    }

    pub fn with_site_feature(mut self, feature: SiteFeature) -> Self {
        self.site_features.push(feature);
        self
    }
}

fn default_true() -> bool {
    true
}

/// An environmental condition affecting a region (heat wave, solar flare).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentCondition {
    pub type_id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Host-internal conditions are not shown in the host's UI.
    #[serde(default = "default_true")]
    pub user_visible: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl EnvironmentCondition {
    pub fn new(type_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            description: String::new(),
            user_visible: true,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn invisible(mut self) -> Self {
        self.user_visible = false;
        self
    }
}

/// One entry of the host's alert log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub class: AlertClass,
    pub label: String,
    #[serde(default)]
    pub tooltip: String,
    /// Creation tick; unknown on some host versions.
    #[serde(default)]
    pub created_tick: Option<i64>,
}

impl Alert {
    pub fn new(class: AlertClass, label: impl Into<String>) -> Self {
        Self {
            class,
            label: label.into(),
            tooltip: String::new(),
            created_tick: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn created_at(mut self, tick: i64) -> Self {
        self.created_tick = Some(tick);
        self
    }
}

/// The complete state of one loaded simulation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Current simulation tick.
    pub tick: i64,

    /// Identifier partitioning per-save filters.
    #[serde(default)]
    pub scope_id: Option<String>,

    /// Active language for rule packs.
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub regions: HashMap<RegionId, Region>,

    #[serde(default)]
    pub tasks: Vec<NarrativeTask>,

    /// Active conditions per region.
    #[serde(default)]
    pub conditions: HashMap<RegionId, Vec<EnvironmentCondition>>,

    /// Alert log, oldest first.
    #[serde(default)]
    pub alerts: Vec<Alert>,

    #[serde(default)]
    pub actors: HashMap<ActorId, Actor>,

    /// Language -> task type id -> description rules.
    #[serde(default)]
    pub rule_packs: HashMap<String, HashMap<String, RulePack>>,

    /// Task types defined by the loaded content.
    #[serde(default)]
    pub known_task_types: HashSet<String>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region to the world.
    pub fn add_region(&mut self, region: Region) -> RegionId {
        let id = region.id;
        self.regions.insert(id, region);
        id
    }

    /// Add a task to the registry, registering its type as known.
    pub fn add_task(&mut self, task: NarrativeTask) -> TaskId {
        let id = task.id;
        if let Some(type_id) = &task.type_id {
            self.known_task_types.insert(type_id.clone());
        }
        self.tasks.push(task);
        id
    }

    /// Add an active condition to a region.
    pub fn add_condition(&mut self, region: RegionId, condition: EnvironmentCondition) {
        self.conditions.entry(region).or_default().push(condition);
    }

    /// Append to the alert log.
    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Add an actor to the world.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        self.actors.insert(id, actor);
        id
    }

    /// Register description rules for a task type in a language.
    pub fn add_rule_pack(
        &mut self,
        language: impl Into<String>,
        type_id: impl Into<String>,
        pack: RulePack,
    ) {
        self.rule_packs
            .entry(language.into())
            .or_default()
            .insert(type_id.into(), pack);
    }

    /// Get mutable task by ID.
    pub fn get_task_mut(&mut self, id: TaskId) -> Option<&mut NarrativeTask> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Advance time by given ticks.
    pub fn advance_ticks(&mut self, ticks: i64) {
        self.tick += ticks;
    }
}
