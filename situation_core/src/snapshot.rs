//! Situation snapshots and filterable entities.

use serde::{Deserialize, Serialize};
use sim_world::TaskId;

/// Kind tag carried by task snapshots.
pub const TASK_KIND: &str = "Quest";

/// Prefix of kind tags for environment conditions.
pub const CONDITION_KIND_PREFIX: &str = "GameCondition_";

/// Prefix of kind tags for site features.
pub const SITE_FEATURE_KIND_PREFIX: &str = "SitePart_";

/// Visibility category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Task,
    Condition,
    Threat,
    SiteFeature,
}

impl Category {
    /// Derive the category from a kind tag and threat flag.
    ///
    /// Unknown kinds fall back to `Task`.
    pub fn from_kind(kind: &str, is_threat: bool) -> Self {
        if kind == TASK_KIND {
            Category::Task
        } else if kind.starts_with(CONDITION_KIND_PREFIX) {
            Category::Condition
        } else if kind.starts_with(SITE_FEATURE_KIND_PREFIX) {
            Category::SiteFeature
        } else if is_threat {
            Category::Threat
        } else {
            Category::Task
        }
    }
}

/// One ongoing condition, threat, task, or location feature at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SituationSnapshot {
    /// Root type id of the underlying task, condition, site feature or alert.
    pub source_type_id: Option<String>,
    /// Kind tag, e.g. `Quest` or `GameCondition_HeatWave`.
    pub kind: String,
    pub label: String,
    pub body: String,
    /// Structured description; preferred over `body` when present.
    pub description: Option<String>,
    pub is_threat: bool,
    /// Live task instance, for task snapshots.
    pub instance_id: Option<TaskId>,
}

impl SituationSnapshot {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source_type_id: None,
            kind: kind.into(),
            label: label.into(),
            body: String::new(),
            description: None,
            is_threat: false,
            instance_id: None,
        }
    }

    pub fn with_source(mut self, source_type_id: impl Into<String>) -> Self {
        self.source_type_id = Some(source_type_id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_instance(mut self, instance_id: TaskId) -> Self {
        self.instance_id = Some(instance_id);
        self
    }

    pub fn threat(mut self) -> Self {
        self.is_threat = true;
        self
    }

    pub fn category(&self) -> Category {
        Category::from_kind(&self.kind, self.is_threat)
    }

    /// The structured description if non-empty, otherwise the generic body.
    pub fn base_body(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => &self.body,
        }
    }
}

/// An entity as seen by the visibility rules and the settings UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterableEntity {
    /// Stable across all instances of one type.
    pub root_id: String,
    pub display_name: String,
    /// Generated instance name, e.g. "Pickles the Destitute".
    pub instance_name: Option<String>,
    pub category: Category,
    /// Only tasks carry instance identity.
    pub instance_id: Option<String>,
}

impl FilterableEntity {
    pub fn new(root_id: impl Into<String>, category: Category) -> Self {
        let root_id = root_id.into();
        Self {
            display_name: root_id.clone(),
            root_id,
            instance_name: None,
            category,
            instance_id: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }
}
