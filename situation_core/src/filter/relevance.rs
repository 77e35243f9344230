//! Narrows task snapshots to the actors taking part in a conversation.

use sim_world::{ActorId, NarrativeTask, SimulationHost};
use std::collections::HashSet;

use crate::snapshot::{SituationSnapshot, TASK_KIND};

/// Drops task snapshots whose associated actors are all absent from the
/// conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextRelevanceFilter;

impl ContextRelevanceFilter {
    pub fn new() -> Self {
        Self
    }

    /// Keep the relevant snapshots, preserving order.
    ///
    /// An empty participant set keeps everything.
    pub fn filter(
        &self,
        snapshots: Vec<SituationSnapshot>,
        participants: &HashSet<ActorId>,
        host: &dyn SimulationHost,
    ) -> Vec<SituationSnapshot> {
        if participants.is_empty() {
            return snapshots;
        }
        snapshots
            .into_iter()
            .filter(|snap| self.is_relevant(snap, participants, host))
            .collect()
    }

    pub fn is_relevant(
        &self,
        snapshot: &SituationSnapshot,
        participants: &HashSet<ActorId>,
        host: &dyn SimulationHost,
    ) -> bool {
        if snapshot.is_threat || snapshot.kind != TASK_KIND {
            return true;
        }

        let Some(task) = Self::find_live_task(snapshot, host) else {
            return true;
        };

        let actors = task.key_actors();
        actors.is_empty() || actors.iter().any(|a| participants.contains(a))
    }

    /// Resolve the live task behind a snapshot.
    ///
    /// The carried instance id wins; snapshots without one fall back to the
    /// first ongoing task of the same root type whose label the snapshot label
    /// starts with.
    pub fn find_live_task<'h>(
        snapshot: &SituationSnapshot,
        host: &'h dyn SimulationHost,
    ) -> Option<&'h NarrativeTask> {
        if let Some(id) = snapshot.instance_id {
            return host.task(id);
        }

        let source = snapshot.source_type_id.as_deref()?;
        host.tasks().iter().find(|task| {
            task.is_ongoing()
                && task.type_id.as_deref() == Some(source)
                && snapshot.label.starts_with(&task.label())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::CONDITION_KIND_PREFIX;
    use sim_world::{Actor, PlaceRef, SubPart, TaskState, WorldState};

    fn task_with_actor(world: &mut WorldState, name: &str, actor: ActorId) -> NarrativeTask {
        let task = NarrativeTask::new("Hospitality_Refugee")
            .with_name(name)
            .with_state(TaskState::Ongoing)
            .with_part(SubPart::ActorPresence {
                actor: Some(actor),
                actors: Vec::new(),
                place: PlaceRef::default(),
            });
        world.add_task(task.clone());
        task
    }

    #[test]
    fn test_empty_participants_pass_everything() {
        let world = WorldState::new();
        let snaps = vec![SituationSnapshot::new(TASK_KIND, "Anything")];

        let kept = ContextRelevanceFilter::new().filter(snaps, &HashSet::new(), &world);

        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_task_requires_participant_overlap() {
        let mut world = WorldState::new();
        let ada = world.add_actor(Actor::new("Ada"));
        let bob = world.add_actor(Actor::new("Bob"));
        let task = task_with_actor(&mut world, "Refugee request", ada);

        let snap = SituationSnapshot::new(TASK_KIND, "Refugee request [accepted just now]")
            .with_source("Hospitality_Refugee")
            .with_instance(task.id);
        let filter = ContextRelevanceFilter::new();

        assert!(filter.is_relevant(&snap, &HashSet::from([ada]), &world));
        assert!(!filter.is_relevant(&snap, &HashSet::from([bob]), &world));
    }

    #[test]
    fn test_label_prefix_fallback() {
        let mut world = WorldState::new();
        let ada = world.add_actor(Actor::new("Ada"));
        let bob = world.add_actor(Actor::new("Bob"));
        task_with_actor(&mut world, "Refugee request", ada);

        let snap = SituationSnapshot::new(TASK_KIND, "Refugee request | characters: Ada")
            .with_source("Hospitality_Refugee");

        assert!(!ContextRelevanceFilter::new().is_relevant(&snap, &HashSet::from([bob]), &world));
    }

    #[test]
    fn test_non_tasks_and_unmatched_pass() {
        let mut world = WorldState::new();
        let bob = world.add_actor(Actor::new("Bob"));
        let participants = HashSet::from([bob]);
        let filter = ContextRelevanceFilter::new();

        let condition = SituationSnapshot::new(format!("{CONDITION_KIND_PREFIX}HeatWave"), "Heat wave");
        let threat = SituationSnapshot::new("ThreatBig", "Raid").threat();
        let orphan = SituationSnapshot::new(TASK_KIND, "Gone").with_source("Nowhere");

        assert!(filter.is_relevant(&condition, &participants, &world));
        assert!(filter.is_relevant(&threat, &participants, &world));
        assert!(filter.is_relevant(&orphan, &participants, &world));
    }

    #[test]
    fn test_task_without_actors_passes() {
        let mut world = WorldState::new();
        let bob = world.add_actor(Actor::new("Bob"));
        let task = NarrativeTask::new("Lonely").with_state(TaskState::Ongoing);
        let id = world.add_task(task);

        let snap = SituationSnapshot::new(TASK_KIND, "Lonely").with_instance(id);

        assert!(ContextRelevanceFilter::new().is_relevant(&snap, &HashSet::from([bob]), &world));
    }
}
