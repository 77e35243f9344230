//! Lists of entities for a settings UI: what is shown right now, which root
//! types exist, which task instances can be hidden.

use sim_world::{Region, SimulationHost};
use std::collections::HashSet;

use crate::affinity::AffinityResolver;
use crate::config::SituationSettings;
use crate::snapshot::{Category, FilterableEntity, SituationSnapshot};

const AGE_SUFFIX: &str = " [";
const ACTORS_SUFFIX: &str = " | characters:";

/// One filterable entity per extracted snapshot that has a source type.
///
/// Task labels lose their age marker and actor list so the instance name
/// reads like the host's own title.
pub fn appendable_entities(snapshots: &[SituationSnapshot]) -> Vec<FilterableEntity> {
    snapshots
        .iter()
        .filter_map(|snap| {
            let root = snap.source_type_id.as_deref().filter(|s| !s.is_empty())?;
            let category = snap.category();
            let name = match category {
                Category::Task => base_task_label(&snap.label),
                _ => snap.label.as_str(),
            };
            Some(FilterableEntity::new(root, category).with_instance_name(name))
        })
        .collect()
}

/// Strip the decorations the extractor appends to task labels.
pub fn base_task_label(label: &str) -> &str {
    let mut base = label;
    for suffix in [AGE_SUFFIX, ACTORS_SUFFIX] {
        if let Some(idx) = base.find(suffix).filter(|&i| i > 0) {
            base = &base[..idx];
        }
    }
    base
}

/// Distinct root types currently shown, then disabled types that are not.
///
/// Disabled types that are absent from the snapshot list are reported as
/// tasks, since the settings never recorded their category.
pub fn available_types(
    snapshots: &[SituationSnapshot],
    settings: &SituationSettings,
) -> Vec<FilterableEntity> {
    let mut seen = HashSet::new();
    let mut types = Vec::new();

    for entity in appendable_entities(snapshots) {
        if seen.insert(entity.root_id.clone()) {
            types.push(FilterableEntity::new(entity.root_id, entity.category));
        }
    }

    for disabled in &settings.disabled_type_ids {
        if seen.insert(disabled.clone()) {
            types.push(FilterableEntity::new(disabled.as_str(), Category::Task));
        }
    }

    types
}

/// Split a type list into (available, disabled) columns.
pub fn partition_types(
    types: Vec<FilterableEntity>,
    settings: &SituationSettings,
) -> (Vec<FilterableEntity>, Vec<FilterableEntity>) {
    types
        .into_iter()
        .partition(|t| !settings.is_type_disabled(&t.root_id))
}

/// Task instances in this region that support per-instance hiding.
pub fn current_task_instances(
    host: &dyn SimulationHost,
    region: &Region,
    resolver: &mut AffinityResolver,
) -> Vec<FilterableEntity> {
    host.tasks()
        .iter()
        .filter(|t| t.is_ongoing() && !t.hidden && !t.root_special)
        .filter(|t| resolver.affects(host, t, region))
        .map(|t| {
            let root = t.type_id.as_deref().unwrap_or("Unknown");
            FilterableEntity::new(root, Category::Task)
                .with_instance_name(t.label())
                .with_instance_id(t.id.to_string())
        })
        .collect()
}

/// Whether an instance may be hidden or unhidden right now.
pub fn can_toggle_instance(
    instance_id: &str,
    entities: &[FilterableEntity],
    settings: &SituationSettings,
    scope_id: Option<&str>,
) -> bool {
    if instance_id.is_empty() || scope_id.map_or(true, str::is_empty) {
        return false;
    }
    entities
        .iter()
        .find(|e| e.instance_id.as_deref() == Some(instance_id))
        .is_some_and(|e| !settings.is_type_disabled(&e.root_id))
}
