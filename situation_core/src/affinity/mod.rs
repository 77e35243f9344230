//! Affinity Resolver - decides whether a narrative task happens in a region.
//!
//! Strategy, first match wins:
//! 1. **Declared targets**: a target names the region, its owning object, or its tile
//! 2. **Sub-part scan**: a location-bearing sub-part, outside the non-locational
//!    kinds, references the region or its owning object
//! 3. Otherwise the task is not affine
//!
//! Results are cached per (task, region) for the lifetime of a session.

mod cache;

pub use cache::*;

use sim_world::{NarrativeTask, Region, RegionId, SimulationHost, TaskId};

/// Computes and caches task/region affinity.
#[derive(Debug, Clone, Default)]
pub struct AffinityResolver {
    cache: AffinityCache,
}

impl AffinityResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `task` pertains to `region`, reusing a cached answer when present.
    pub fn affects(
        &mut self,
        host: &dyn SimulationHost,
        task: &NarrativeTask,
        region: &Region,
    ) -> bool {
        if let Some(cached) = self.cache.get(task.id, region.id) {
            tracing::debug!(
                "Affinity cache hit: task={}, region={}, affects={}",
                task.id,
                region.id,
                cached
            );
            return cached;
        }

        let computed = Self::compute(host, task, region);
        self.cache.store(task.id, region.id, computed);
        tracing::debug!(
            "Affinity cache stored: task={}, region={}, affects={}",
            task.id,
            region.id,
            computed
        );
        computed
    }

    /// Resolve by ids. Unknown task or region yields `false` and is not cached.
    pub fn affects_ids(
        &mut self,
        host: &dyn SimulationHost,
        task: TaskId,
        region: RegionId,
    ) -> bool {
        match (host.task(task), host.region(region)) {
            (Some(task), Some(region)) => self.affects(host, task, region),
            _ => false,
        }
    }

    /// Uncached evaluation of the strategy.
    pub fn compute(host: &dyn SimulationHost, task: &NarrativeTask, region: &Region) -> bool {
        Self::matches_declared_targets(task, region) || Self::matches_sub_parts(host, task, region)
    }

    fn matches_declared_targets(task: &NarrativeTask, region: &Region) -> bool {
        task.targets.iter().any(|target| {
            if target.region == Some(region.id) {
                return true;
            }
            if target.parent.is_some() && target.parent == region.parent {
                return true;
            }
            matches!(
                (target.tile, region.tile),
                (Some(t), Some(r)) if t.is_valid() && t == r
            )
        })
    }

    fn matches_sub_parts(host: &dyn SimulationHost, task: &NarrativeTask, region: &Region) -> bool {
        task.parts
            .iter()
            .filter(|part| !part.kind().is_non_locational())
            .filter_map(|part| part.location())
            .any(|place| {
                if place.region_ref() == Some(region.id) {
                    return true;
                }
                match place.parent_ref() {
                    Some(parent) => {
                        region.parent == Some(parent)
                            || host.region_of_parent(parent) == Some(region.id)
                    }
                    None => false,
                }
            })
    }

    /// Forget cached results for a task whose structure or state changed.
    pub fn invalidate_task(&mut self, task: TaskId) {
        let removed = self.cache.invalidate_task(task);
        tracing::debug!("Invalidated {} affinity entries for task {}", removed, task);
    }

    /// Forget cached results for a region that was removed.
    pub fn invalidate_region(&mut self, region: RegionId) {
        let removed = self.cache.invalidate_region(region);
        tracing::debug!("Invalidated {} affinity entries for region {}", removed, region);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &AffinityCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_world::{PlaceRef, SubPart, TaskTarget, TileId, WorldObjectId, WorldState};

    fn world_with_region(region: Region) -> (WorldState, RegionId) {
        let mut world = WorldState::new();
        let id = world.add_region(region);
        (world, id)
    }

    #[test]
    fn test_declared_region_target() {
        let (world, region_id) = world_with_region(Region::home("Base"));
        let region = &world.regions[&region_id];
        let task = NarrativeTask::new("X").with_target(TaskTarget::region(region_id));

        assert!(AffinityResolver::compute(&world, &task, region));
    }

    #[test]
    fn test_declared_parent_and_tile_targets() {
        let site = WorldObjectId::new();
        let (world, region_id) =
            world_with_region(Region::away("Camp").with_parent(site).with_tile(TileId(12)));
        let region = &world.regions[&region_id];

        let by_parent = NarrativeTask::new("X").with_target(TaskTarget::parent(site));
        let by_tile = NarrativeTask::new("X").with_target(TaskTarget::tile(TileId(12)));
        let invalid_tile = NarrativeTask::new("X").with_target(TaskTarget::tile(TileId(-1)));

        assert!(AffinityResolver::compute(&world, &by_parent, region));
        assert!(AffinityResolver::compute(&world, &by_tile, region));
        assert!(!AffinityResolver::compute(&world, &invalid_tile, region));
    }

    #[test]
    fn test_sub_part_references() {
        let site = WorldObjectId::new();
        let (world, region_id) = world_with_region(Region::away("Camp").with_parent(site));
        let region = &world.regions[&region_id];

        let by_region = NarrativeTask::new("X").with_part(SubPart::RegionEffect {
            place: PlaceRef::region(region_id),
        });
        let by_parent = NarrativeTask::new("X").with_part(SubPart::Site {
            place: PlaceRef::parent(site),
        });

        assert!(AffinityResolver::compute(&world, &by_region, region));
        assert!(AffinityResolver::compute(&world, &by_parent, region));
    }

    #[test]
    fn test_non_locational_parts_ignored() {
        let (world, region_id) = world_with_region(Region::home("Base"));
        let region = &world.regions[&region_id];

        let task = NarrativeTask::new("X")
            .with_part(SubPart::DropOff {
                place: PlaceRef::region(region_id),
            })
            .with_part(SubPart::RewardDelivery {
                place: PlaceRef::region(region_id),
            })
            .with_part(SubPart::AcceptanceRequirement {
                place: PlaceRef::region(region_id),
            });

        assert!(!AffinityResolver::compute(&world, &task, region));
    }

    #[test]
    fn test_no_signal_is_false() {
        let (world, region_id) = world_with_region(Region::home("Base"));
        let region = &world.regions[&region_id];
        let task = NarrativeTask::new("X").with_part(SubPart::Timer {
            duration_ticks: Some(1),
        });

        assert!(!AffinityResolver::compute(&world, &task, region));
    }

    #[test]
    fn test_result_cached_until_invalidated() {
        let (mut world, region_id) = world_with_region(Region::home("Base"));
        let task_id = world.add_task(NarrativeTask::new("X").with_target(TaskTarget::region(region_id)));

        let mut resolver = AffinityResolver::new();
        assert!(resolver.affects_ids(&world, task_id, region_id));

        // Structural change without an invalidation event keeps the cached answer.
        world.get_task_mut(task_id).unwrap().targets.clear();
        assert!(resolver.affects_ids(&world, task_id, region_id));
        assert!(resolver.affects_ids(&world, task_id, region_id));

        resolver.invalidate_task(task_id);
        assert!(!resolver.affects_ids(&world, task_id, region_id));
    }

    #[test]
    fn test_unknown_ids_not_cached() {
        let (world, region_id) = world_with_region(Region::home("Base"));
        let mut resolver = AffinityResolver::new();

        assert!(!resolver.affects_ids(&world, TaskId::new(), region_id));
        assert!(resolver.cache().is_empty());
    }
}
