//! Per-session cache of task/region affinity results.

use sim_world::{RegionId, TaskId};
use std::collections::HashMap;

/// Cached affinity results keyed by (task, region).
///
/// Entries stay valid until an explicit invalidation: a task changing state,
/// a region being removed, or the session ending. There is no timer.
#[derive(Debug, Clone, Default)]
pub struct AffinityCache {
    entries: HashMap<(TaskId, RegionId), bool>,
    hits: u64,
    misses: u64,
}

impl AffinityCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result, counting the hit or miss.
    pub fn get(&mut self, task: TaskId, region: RegionId) -> Option<bool> {
        let found = self.entries.get(&(task, region)).copied();
        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        found
    }

    /// Check presence without touching the counters.
    pub fn contains(&self, task: TaskId, region: RegionId) -> bool {
        self.entries.contains_key(&(task, region))
    }

    /// Store a result, replacing any previous one for the same key.
    pub fn store(&mut self, task: TaskId, region: RegionId, affects: bool) {
        self.entries.insert((task, region), affects);
    }

    /// Forget every entry for a task. Returns the number removed.
    pub fn invalidate_task(&mut self, task: TaskId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(t, _), _| *t != task);
        before - self.entries.len()
    }

    /// Forget every entry for a region. Returns the number removed.
    pub fn invalidate_region(&mut self, region: RegionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, r), _| *r != region);
        before - self.entries.len()
    }

    /// Clear all entries and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
