//! Session context object: everything that lives for one loaded simulation.

use sim_world::{ActorId, RegionId, SimulationHost, TaskId};
use std::collections::HashSet;

use crate::affinity::AffinityResolver;
use crate::compression::{CompressionEngine, TemplateLibrary};
use crate::config::SituationSettings;
use crate::delivery::{deliver, DeliveryChannel, PromptTarget};
use crate::extractor::SituationExtractor;
use crate::filter::{ContextRelevanceFilter, FilterPolicy};
use crate::formatter::Formatter;
use crate::snapshot::SituationSnapshot;

/// Character budget for the per-snapshot debug dump.
const DUMP_MAX_CHARS: usize = 800;

/// What one dialogue prompt asks for.
#[derive(Debug, Clone, Default)]
pub struct PromptRequest {
    /// Region of the initiating actor.
    pub region: Option<RegionId>,
    /// Danger as reported by the caller; only honored on home regions.
    pub in_danger: bool,
    /// Actors taking part in the conversation.
    pub participants: HashSet<ActorId>,
}

impl PromptRequest {
    pub fn for_region(region: RegionId) -> Self {
        Self {
            region: Some(region),
            ..Self::default()
        }
    }

    pub fn in_danger(mut self, in_danger: bool) -> Self {
        self.in_danger = in_danger;
        self
    }

    pub fn with_participants(mut self, participants: impl IntoIterator<Item = ActorId>) -> Self {
        self.participants.extend(participants);
        self
    }
}

/// Per-session state: the affinity cache and the compression library.
///
/// Create one with [`SituationSession::open`] when a simulation loads and
/// drop it with [`SituationSession::close`] on unload.
#[derive(Debug, Clone, Default)]
pub struct SituationSession {
    resolver: AffinityResolver,
    engine: CompressionEngine,
}

impl SituationSession {
    pub fn open(library: TemplateLibrary) -> Self {
        tracing::debug!(
            "Situation session opened with {} template(s), {} extraction rule(s)",
            library.templates.len(),
            library.extractions.len()
        );
        Self {
            resolver: AffinityResolver::new(),
            engine: CompressionEngine::new(library),
        }
    }

    pub fn close(mut self) {
        let cache = self.resolver.cache();
        tracing::debug!(
            "Situation session closed: {} cached affinities, {} hits, {} misses",
            cache.len(),
            cache.hits(),
            cache.misses()
        );
        self.resolver.clear();
    }

    pub fn resolver(&self) -> &AffinityResolver {
        &self.resolver
    }

    pub fn engine(&self) -> &CompressionEngine {
        &self.engine
    }

    /// Prewarm the affinity cache for a freshly loaded region and dump what
    /// would be shown there. Returns the snapshots of the dump.
    pub fn on_region_finalized(
        &mut self,
        host: &dyn SimulationHost,
        settings: &SituationSettings,
        region: RegionId,
    ) -> Vec<SituationSnapshot> {
        let Some(region_ref) = host.region(region) else {
            return Vec::new();
        };

        for task in host.tasks() {
            self.resolver.affects(host, task, region_ref);
        }

        let snapshots = self.extract(host, settings, region, false, false);
        tracing::debug!(
            "{} ongoing situation(s) in region {} at load",
            snapshots.len(),
            region_ref.name
        );
        let formatter = self.formatter(host, settings);
        for snapshot in &snapshots {
            let kind = if snapshot.is_threat { "[THREAT]" } else { "[EVENT]" };
            let block = formatter.format(std::slice::from_ref(snapshot), DUMP_MAX_CHARS);
            tracing::debug!("{} {}\n{}", kind, snapshot.label, block);
        }
        snapshots
    }

    /// A task was accepted, completed, or otherwise restructured.
    pub fn on_task_changed(&mut self, task: TaskId) {
        self.resolver.invalidate_task(task);
    }

    pub fn on_region_removed(&mut self, region: RegionId) {
        self.resolver.invalidate_region(region);
    }

    /// Situations for a region under the current settings.
    pub fn extract(
        &mut self,
        host: &dyn SimulationHost,
        settings: &SituationSettings,
        region: RegionId,
        is_high_danger: bool,
        conflict_active: bool,
    ) -> Vec<SituationSnapshot> {
        let Some(region) = host.region(region) else {
            return Vec::new();
        };
        let policy = FilterPolicy::new(settings).with_conflict(conflict_active);
        SituationExtractor::new(settings.limits.clone()).extract(
            host,
            region,
            is_high_danger,
            &policy,
            &mut self.resolver,
        )
    }

    /// The full pipeline for one prompt. `None` when there is nothing to say.
    pub fn build_block(
        &mut self,
        host: &dyn SimulationHost,
        settings: &SituationSettings,
        request: &PromptRequest,
        conflict_active: bool,
    ) -> Option<String> {
        let region = host.region(request.region?)?;
        let in_danger = region.is_home && request.in_danger;

        let mut snapshots = self.extract(host, settings, region.id, in_danger, conflict_active);
        if settings.context_filter_enabled {
            snapshots = ContextRelevanceFilter::new().filter(snapshots, &request.participants, host);
        }
        if snapshots.is_empty() {
            return None;
        }

        Some(self.formatter(host, settings).format(&snapshots, settings.limits.max_chars))
    }

    /// Build the block and hand it to the prompt target.
    pub fn decorate_prompt(
        &mut self,
        target: &mut dyn PromptTarget,
        host: &dyn SimulationHost,
        settings: &SituationSettings,
        request: &PromptRequest,
        conflict_active: bool,
    ) -> Option<DeliveryChannel> {
        let block = self.build_block(host, settings, request, conflict_active)?;
        deliver(target, &block)
    }

    /// Drop hidden-instance entries for tasks that are gone.
    pub fn sweep_stale_instances(
        &self,
        host: &dyn SimulationHost,
        settings: &mut SituationSettings,
    ) -> usize {
        settings.sweep_stale_instances(host)
    }

    fn formatter<'a>(
        &'a self,
        host: &'a dyn SimulationHost,
        settings: &SituationSettings,
    ) -> Formatter<'a> {
        if settings.compression_enabled {
            Formatter::with_compression(&self.engine, host)
        } else {
            Formatter::new()
        }
    }
}
