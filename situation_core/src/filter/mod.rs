//! Visibility rules applied during extraction, plus the supporting pieces
//! a settings UI needs: catalogs of what is currently shown and the one-time
//! legacy blacklist import.

mod catalog;
mod migration;
mod relevance;

pub use catalog::*;
pub use migration::*;
pub use relevance::*;

use crate::config::SituationSettings;
use crate::snapshot::{Category, SituationSnapshot};

/// Read-only visibility view over the persisted settings.
///
/// `conflict_active` is raised when another installed feature already injects
/// task, condition and threat context; it switches those categories off but
/// never touches site features.
#[derive(Debug, Clone, Copy)]
pub struct FilterPolicy<'a> {
    settings: &'a SituationSettings,
    conflict_active: bool,
}

impl<'a> FilterPolicy<'a> {
    pub fn new(settings: &'a SituationSettings) -> Self {
        Self {
            settings,
            conflict_active: false,
        }
    }

    pub fn with_conflict(mut self, conflict_active: bool) -> Self {
        self.conflict_active = conflict_active;
        self
    }

    pub fn settings(&self) -> &'a SituationSettings {
        self.settings
    }

    /// Effective category toggle after the conflict override.
    pub fn category_enabled(&self, category: Category) -> bool {
        match category {
            Category::Task => self.settings.show_tasks && !self.conflict_active,
            Category::Condition => self.settings.show_conditions && !self.conflict_active,
            Category::Threat => self.settings.show_threats && !self.conflict_active,
            Category::SiteFeature => self.settings.show_site_features,
        }
    }

    pub fn is_visible(
        &self,
        category: Category,
        root_type_id: Option<&str>,
        instance_id: Option<&str>,
        scope_id: Option<&str>,
    ) -> bool {
        if !self.category_enabled(category) {
            return false;
        }

        if root_type_id.is_some_and(|id| self.settings.is_type_disabled(id)) {
            return false;
        }

        match (instance_id, scope_id) {
            (Some(instance), Some(scope)) => !self.settings.is_instance_disabled(scope, instance),
            _ => true,
        }
    }

    pub fn is_snapshot_visible(&self, snapshot: &SituationSnapshot, scope_id: Option<&str>) -> bool {
        let instance = snapshot.instance_id.map(|id| id.to_string());
        self.is_visible(
            snapshot.category(),
            snapshot.source_type_id.as_deref(),
            instance.as_deref(),
            scope_id,
        )
    }
}
