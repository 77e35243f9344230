//! Persisted settings.
//!
//! Settings are stored as TOML. Every field has a default so files written
//! by older versions, or hand-edited ones with missing sections, still load.

use serde::{Deserialize, Serialize};
use sim_world::{SimulationHost, TaskId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Per-scope set of disabled task instance ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledSet {
    #[serde(default)]
    pub ids: BTreeSet<String>,
}

impl DisabledSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Bounds applied to one extraction and formatting pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    /// Maximum number of snapshots per block
    pub max_entities: usize,
    /// Maximum number of alerts scanned for a threat
    pub max_lookback: usize,
    /// Character budget of the formatted block
    pub max_chars: usize,
    /// Threat alerts older than this many ticks are ignored
    pub threat_timeout_ticks: i64,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_entities: 5,
            max_lookback: 30,
            max_chars: 1200,
            threat_timeout_ticks: 36_000,
        }
    }
}

/// Complete persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SituationSettings {
    /// Rewrite verbose descriptions through compact templates
    pub compression_enabled: bool,
    pub show_tasks: bool,
    pub show_conditions: bool,
    pub show_threats: bool,
    pub show_site_features: bool,
    /// Root type ids hidden in every scope
    pub disabled_type_ids: BTreeSet<String>,
    /// Set once the legacy blacklist has been folded into `disabled_type_ids`
    pub legacy_blacklist_migrated: bool,
    /// Narrow tasks to those involving conversation participants
    pub context_filter_enabled: bool,
    /// Scope id -> hidden task instance ids
    pub disabled_instances: BTreeMap<String, DisabledSet>,
    pub limits: ExtractionLimits,
}

impl Default for SituationSettings {
    fn default() -> Self {
        Self {
            compression_enabled: true,
            show_tasks: true,
            show_conditions: true,
            show_threats: true,
            show_site_features: true,
            disabled_type_ids: BTreeSet::new(),
            legacy_blacklist_migrated: false,
            context_filter_enabled: true,
            disabled_instances: BTreeMap::new(),
            limits: ExtractionLimits::default(),
        }
    }
}

impl SituationSettings {
    /// Loads settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Writes settings to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serializes the settings as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn is_type_disabled(&self, type_id: &str) -> bool {
        !type_id.is_empty() && self.disabled_type_ids.contains(type_id)
    }

    pub fn is_instance_disabled(&self, scope_id: &str, instance_id: &str) -> bool {
        if scope_id.is_empty() || instance_id.is_empty() {
            return false;
        }
        self.disabled_instances
            .get(scope_id)
            .is_some_and(|set| set.contains(instance_id))
    }

    /// Hide a root type everywhere. Returns false if it was already hidden.
    pub fn disable_type(&mut self, type_id: impl Into<String>) -> bool {
        let type_id = type_id.into();
        if type_id.is_empty() {
            return false;
        }
        self.disabled_type_ids.insert(type_id)
    }

    pub fn enable_type(&mut self, type_id: &str) -> bool {
        self.disabled_type_ids.remove(type_id)
    }

    /// Hide one task instance within a scope, creating the scope's set on demand.
    pub fn disable_instance(&mut self, scope_id: &str, instance_id: impl Into<String>) -> bool {
        let instance_id = instance_id.into();
        if scope_id.is_empty() || instance_id.is_empty() {
            return false;
        }
        self.disabled_instances
            .entry(scope_id.to_string())
            .or_default()
            .ids
            .insert(instance_id)
    }

    /// Unhide one task instance; the scope's set is dropped once empty.
    pub fn enable_instance(&mut self, scope_id: &str, instance_id: &str) -> bool {
        let removed = self
            .disabled_instances
            .get_mut(scope_id)
            .is_some_and(|set| set.ids.remove(instance_id));
        self.prune_scope(scope_id);
        removed
    }

    /// Remove a scope's set if it holds nothing.
    pub fn prune_scope(&mut self, scope_id: &str) {
        if self
            .disabled_instances
            .get(scope_id)
            .is_some_and(DisabledSet::is_empty)
        {
            self.disabled_instances.remove(scope_id);
        }
    }

    /// Drop hidden instances of the host's scope that are no longer ongoing.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_stale_instances(&mut self, host: &dyn SimulationHost) -> usize {
        let Some(scope_id) = host.scope_id() else {
            return 0;
        };
        let Some(set) = self.disabled_instances.get_mut(scope_id) else {
            return 0;
        };

        let live: HashSet<String> = host
            .tasks()
            .iter()
            .filter(|t| t.is_ongoing())
            .map(|t| t.id.to_string())
            .collect();

        let before = set.ids.len();
        set.ids.retain(|id| live.contains(id));
        let removed = before - set.ids.len();

        let scope_id = scope_id.to_string();
        self.prune_scope(&scope_id);

        if removed > 0 {
            tracing::info!(
                "Removed {} stale hidden instance(s) from scope {}",
                removed,
                scope_id
            );
        }
        removed
    }

    /// Convenience for instance ids that come from the host.
    pub fn is_task_disabled(&self, scope_id: Option<&str>, task: TaskId) -> bool {
        scope_id.is_some_and(|scope| self.is_instance_disabled(scope, &task.to_string()))
    }
}

impl FromStr for SituationSettings {
    type Err = ConfigError;

    /// Parses settings from a TOML string.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}
