//! The adapter boundary between the host simulation and the pipeline.

use crate::entities::{Actor, ActorId, NarrativeTask, WorldObjectId};
use crate::rules::RulePack;

use super::{Alert, EnvironmentCondition, Region, RegionId, TaskId, WorldState};

/// Read-only view of a running simulation.
///
/// Swap implementations, not pipeline code, when the host changes shape.
pub trait SimulationHost {
    /// Current simulation tick.
    fn current_tick(&self) -> i64;

    /// Identifier partitioning per-save filters, if a save is loaded.
    fn scope_id(&self) -> Option<&str>;

    fn region(&self, id: RegionId) -> Option<&Region>;

    /// Region hosted by a world object, if it currently has one.
    fn region_of_parent(&self, parent: WorldObjectId) -> Option<RegionId>;

    /// All tasks in the registry, in host order.
    fn tasks(&self) -> &[NarrativeTask];

    fn task(&self, id: TaskId) -> Option<&NarrativeTask> {
        self.tasks().iter().find(|t| t.id == id)
    }

    /// Active conditions for a region.
    fn conditions(&self, region: RegionId) -> &[EnvironmentCondition];

    /// Recent alerts, oldest first.
    fn alerts(&self) -> &[Alert];

    fn actor(&self, id: ActorId) -> Option<&Actor>;

    /// Description rules for a task type in the current language.
    fn description_rules(&self, type_id: &str) -> Option<&RulePack>;

    /// Whether the loaded content defines this task type.
    fn knows_task_type(&self, type_id: &str) -> bool;
}

impl SimulationHost for WorldState {
    fn current_tick(&self) -> i64 {
        self.tick
    }

    fn scope_id(&self) -> Option<&str> {
        self.scope_id.as_deref().filter(|s| !s.is_empty())
    }

    fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    fn region_of_parent(&self, parent: WorldObjectId) -> Option<RegionId> {
        self.regions
            .values()
            .find(|r| r.parent == Some(parent))
            .map(|r| r.id)
    }

    fn tasks(&self) -> &[NarrativeTask] {
        &self.tasks
    }

    fn conditions(&self, region: RegionId) -> &[EnvironmentCondition] {
        self.conditions
            .get(&region)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    fn description_rules(&self, type_id: &str) -> Option<&RulePack> {
        self.rule_packs.get(&self.language)?.get(type_id)
    }

    fn knows_task_type(&self, type_id: &str) -> bool {
        self.known_task_types.contains(type_id)
    }
}
