//! Situation Extractor - collects the ongoing situations of one region.
//!
//! Priority order, each stage capped by the remaining capacity:
//! 1. Site features, for away regions
//! 2. At most one recent threat alert, when the caller reports high danger
//! 3. Active, user-visible environment conditions
//! 4. Ongoing, non-hidden tasks affine to the region
//!
//! Visibility rules are applied before an entity counts against capacity.

use sim_world::{NarrativeTask, Region, SimulationHost, TICKS_PER_DAY, TICKS_PER_HOUR};

use crate::affinity::AffinityResolver;
use crate::config::ExtractionLimits;
use crate::filter::FilterPolicy;
use crate::snapshot::{SituationSnapshot, CONDITION_KIND_PREFIX, SITE_FEATURE_KIND_PREFIX, TASK_KIND};

/// Label prefix for site feature entries.
pub const CURRENT_LOCATION_PREFIX: &str = "[current location] ";

/// Builds snapshot lists for regions.
#[derive(Debug, Clone, Default)]
pub struct SituationExtractor {
    limits: ExtractionLimits,
}

impl SituationExtractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Snapshots for `region`, most urgent first, at most `max_entities` long.
    pub fn extract(
        &self,
        host: &dyn SimulationHost,
        region: &Region,
        is_high_danger: bool,
        policy: &FilterPolicy<'_>,
        resolver: &mut AffinityResolver,
    ) -> Vec<SituationSnapshot> {
        let max = self.limits.max_entities;
        let scope = host.scope_id();
        let mut result = Vec::new();

        if max == 0 {
            return result;
        }

        if !region.is_home {
            self.add_site_features(region, policy, scope, &mut result);
        }

        if is_high_danger && result.len() < max {
            self.add_threat_alert(host, policy, scope, &mut result);
        }

        if result.len() < max {
            self.add_conditions(host, region, policy, scope, &mut result);
        }

        if result.len() < max {
            self.add_tasks(host, region, policy, scope, resolver, &mut result);
        }

        result
    }

    fn push_if_visible(
        &self,
        snapshot: SituationSnapshot,
        policy: &FilterPolicy<'_>,
        scope: Option<&str>,
        result: &mut Vec<SituationSnapshot>,
    ) -> bool {
        if result.len() >= self.limits.max_entities || !policy.is_snapshot_visible(&snapshot, scope) {
            return false;
        }
        result.push(snapshot);
        true
    }

    fn add_site_features(
        &self,
        region: &Region,
        policy: &FilterPolicy<'_>,
        scope: Option<&str>,
        result: &mut Vec<SituationSnapshot>,
    ) {
        for feature in &region.site_features {
            if result.len() >= self.limits.max_entities {
                break;
            }
            let label = if feature.label.is_empty() {
                &feature.type_id
            } else {
                &feature.label
            };
            let snapshot = SituationSnapshot::new(
                format!("{SITE_FEATURE_KIND_PREFIX}{}", feature.type_id),
                format!("{CURRENT_LOCATION_PREFIX}{label}"),
            )
            .with_source(feature.type_id.as_str())
            .with_body(feature.description.as_str());
            self.push_if_visible(snapshot, policy, scope, result);
        }
    }

    /// Newest-first scan; the log is assumed to age monotonically, so the
    /// first threat past the timeout ends the scan.
    fn add_threat_alert(
        &self,
        host: &dyn SimulationHost,
        policy: &FilterPolicy<'_>,
        scope: Option<&str>,
        result: &mut Vec<SituationSnapshot>,
    ) {
        let now = host.current_tick();
        let timeout = self.limits.threat_timeout_ticks;

        for alert in host.alerts().iter().rev().take(self.limits.max_lookback) {
            if !alert.class.is_threat() {
                continue;
            }

            if now >= 0 && timeout > 0 {
                if let Some(created) = alert.created_tick.filter(|&t| t > 0) {
                    if now - created > timeout {
                        break;
                    }
                }
            }

            let tag = alert.class.tag();
            let snapshot = SituationSnapshot::new(tag, alert.label.as_str())
                .with_source(tag)
                .with_body(alert.tooltip.as_str())
                .threat();
            if self.push_if_visible(snapshot, policy, scope, result) {
                break;
            }
        }
    }

    fn add_conditions(
        &self,
        host: &dyn SimulationHost,
        region: &Region,
        policy: &FilterPolicy<'_>,
        scope: Option<&str>,
        result: &mut Vec<SituationSnapshot>,
    ) {
        for condition in host.conditions(region.id) {
            if result.len() >= self.limits.max_entities {
                break;
            }
            if !condition.active || !condition.user_visible {
                continue;
            }
            let snapshot = SituationSnapshot::new(
                format!("{CONDITION_KIND_PREFIX}{}", condition.type_id),
                condition.label.as_str(),
            )
            .with_source(condition.type_id.as_str())
            .with_body(condition.description.as_str());
            self.push_if_visible(snapshot, policy, scope, result);
        }
    }

    fn add_tasks(
        &self,
        host: &dyn SimulationHost,
        region: &Region,
        policy: &FilterPolicy<'_>,
        scope: Option<&str>,
        resolver: &mut AffinityResolver,
        result: &mut Vec<SituationSnapshot>,
    ) {
        let now = host.current_tick();

        for task in host.tasks() {
            if result.len() >= self.limits.max_entities {
                break;
            }
            if task.hidden || !task.is_ongoing() || !resolver.affects(host, task, region) {
                continue;
            }
            let snapshot = task_snapshot(host, task, now);
            self.push_if_visible(snapshot, policy, scope, result);
        }
    }
}

/// Snapshot of a task: decorated label, description as body, live instance id.
pub fn task_snapshot(host: &dyn SimulationHost, task: &NarrativeTask, now: i64) -> SituationSnapshot {
    let mut label = task.label();

    if let Some(marker) = age_marker(now, task.accepted_tick) {
        label.push_str(" [");
        label.push_str(&marker);
        label.push(']');
    }

    let names = actor_names(host, task);
    if !names.is_empty() {
        label.push_str(" | characters: ");
        label.push_str(&names.join(", "));
    }

    let description = task.description.clone().unwrap_or_default();
    let mut snapshot = SituationSnapshot::new(TASK_KIND, label)
        .with_body(description.as_str())
        .with_description(description)
        .with_instance(task.id);
    snapshot.source_type_id = task.type_id.clone();
    snapshot
}

/// Short names of the task's directly associated actors, unnamed ones skipped.
pub fn actor_names(host: &dyn SimulationHost, task: &NarrativeTask) -> Vec<String> {
    task.key_actors()
        .into_iter()
        .filter_map(|id| host.actor(id))
        .filter_map(|actor| actor.display_short_name().map(str::to_string))
        .collect()
}

/// Human-readable time since acceptance, e.g. `accepted ~1.3 days ago`.
///
/// `None` when the task was never accepted.
pub fn age_marker(now: i64, accepted_tick: Option<i64>) -> Option<String> {
    let accepted = accepted_tick.filter(|&t| t > 0)?;
    let elapsed = now - accepted;
    if elapsed <= 0 {
        return Some("accepted just now".to_string());
    }

    let days = elapsed as f64 / TICKS_PER_DAY as f64;
    if days >= 1.0 {
        let rounded = (days * 10.0).round_ties_even() / 10.0;
        return Some(format!("accepted ~{rounded:.1} days ago"));
    }

    let hours = (elapsed as f64 / TICKS_PER_HOUR as f64).round_ties_even() as i64;
    Some(match hours {
        h if h <= 0 => "accepted just now".to_string(),
        1 => "accepted ~1 hour ago".to_string(),
        h => format!("accepted ~{h} hours ago"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SituationSettings;
    use sim_world::{
        Actor, Alert, AlertClass, EnvironmentCondition, PlaceRef, SiteFeature, SubPart, TaskState,
        TaskTarget, WorldState,
    };

    fn extractor(max_entities: usize) -> SituationExtractor {
        SituationExtractor::new(ExtractionLimits {
            max_entities,
            ..ExtractionLimits::default()
        })
    }

    #[test]
    fn test_age_marker() {
        assert_eq!(age_marker(100, None), None);
        assert_eq!(age_marker(100, Some(0)), None);
        assert_eq!(age_marker(100, Some(200)).as_deref(), Some("accepted just now"));
        assert_eq!(age_marker(1_000, Some(1)).as_deref(), Some("accepted just now"));
        assert_eq!(age_marker(2_501, Some(1)).as_deref(), Some("accepted ~1 hour ago"));
        assert_eq!(age_marker(5 * 2_500 + 1, Some(1)).as_deref(), Some("accepted ~5 hours ago"));
        assert_eq!(age_marker(31 * 2_500 + 1, Some(1)).as_deref(), Some("accepted ~1.3 days ago"));
        assert_eq!(age_marker(60_001, Some(1)).as_deref(), Some("accepted ~1.0 days ago"));
    }

    #[test]
    fn test_stage_order_and_capacity() {
        let mut world = WorldState::new();
        world.tick = 10_000;
        let region = world.add_region(
            Region::away("Camp").with_site_feature(SiteFeature::new("Mercs", "ancient mercenaries")),
        );
        world.push_alert(Alert::new(AlertClass::ThreatBig, "Raid").created_at(9_000));
        world.add_condition(region, EnvironmentCondition::new("HeatWave", "Heat wave"));
        world.add_condition(region, EnvironmentCondition::new("Toxic", "Toxic fallout"));

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(3).extract(&world, &world.regions[&region], true, &policy, &mut resolver);

        let labels: Vec<_> = snaps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["[current location] ancient mercenaries", "Raid", "Heat wave"]);
        assert_eq!(snaps[0].kind, "SitePart_Mercs");
        assert!(snaps[1].is_threat);
    }

    #[test]
    fn test_home_region_skips_site_features_and_threats_without_danger() {
        let mut world = WorldState::new();
        let region = world.add_region(
            Region::home("Base").with_site_feature(SiteFeature::new("Mercs", "mercenaries")),
        );
        world.push_alert(Alert::new(AlertClass::ThreatBig, "Raid"));

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(5).extract(&world, &world.regions[&region], false, &policy, &mut resolver);
        assert!(snaps.is_empty());
    }

    #[test]
    fn test_threat_scan_stops_past_timeout() {
        let mut world = WorldState::new();
        world.tick = 100_000;
        let region = world.add_region(Region::home("Base"));
        world.push_alert(Alert::new(AlertClass::ThreatSmall, "Old raid").created_at(10_000));
        world.push_alert(Alert::new(AlertClass::Neutral, "Trader").created_at(99_000));

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(5).extract(&world, &world.regions[&region], true, &policy, &mut resolver);
        assert!(snaps.is_empty());
    }

    #[test]
    fn test_unknown_alert_age_not_filtered() {
        let mut world = WorldState::new();
        world.tick = 1_000_000;
        let region = world.add_region(Region::home("Base"));
        world.push_alert(Alert::new(AlertClass::ThreatBig, "Siege"));

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(5).extract(&world, &world.regions[&region], true, &policy, &mut resolver);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].kind, "ThreatBig");
    }

    #[test]
    fn test_invisible_and_inactive_conditions_skipped() {
        let mut world = WorldState::new();
        let region = world.add_region(Region::home("Base"));
        world.add_condition(region, EnvironmentCondition::new("Hidden", "Hidden").invisible());
        let mut inactive = EnvironmentCondition::new("Over", "Over");
        inactive.active = false;
        world.add_condition(region, inactive);

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(5).extract(&world, &world.regions[&region], false, &policy, &mut resolver);
        assert!(snaps.is_empty());
    }

    #[test]
    fn test_task_label_decorations() {
        let mut world = WorldState::new();
        world.tick = 100_000;
        let region = world.add_region(Region::home("Base"));
        let ada = world.add_actor(Actor::new("Ada Lovelace").with_short_name("Ada"));
        world.add_task(
            NarrativeTask::new("Hospitality_Refugee")
                .with_name("Refugee request")
                .with_description("Ada needs shelter.")
                .with_state(TaskState::Ongoing)
                .with_accepted_tick(100_000 - 31 * 2_500)
                .with_target(TaskTarget::region(region))
                .with_part(SubPart::ActorPresence {
                    actor: Some(ada),
                    actors: vec![ada],
                    place: PlaceRef::default(),
                }),
        );

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(5).extract(&world, &world.regions[&region], false, &policy, &mut resolver);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].label, "Refugee request [accepted ~1.3 days ago] | characters: Ada");
        assert_eq!(snaps[0].source_type_id.as_deref(), Some("Hospitality_Refugee"));
        assert_eq!(snaps[0].base_body(), "Ada needs shelter.");
    }

    #[test]
    fn test_filtered_entities_do_not_use_capacity() {
        let mut world = WorldState::new();
        let region = world.add_region(Region::home("Base"));
        world.add_condition(region, EnvironmentCondition::new("Blocked", "Blocked"));
        world.add_condition(region, EnvironmentCondition::new("Shown", "Shown"));

        let mut settings = SituationSettings::default();
        settings.disable_type("Blocked");
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        let snaps = extractor(1).extract(&world, &world.regions[&region], false, &policy, &mut resolver);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].label, "Shown");
    }

    #[test]
    fn test_zero_capacity() {
        let mut world = WorldState::new();
        let region = world.add_region(Region::home("Base"));
        world.add_condition(region, EnvironmentCondition::new("HeatWave", "Heat wave"));

        let settings = SituationSettings::default();
        let policy = FilterPolicy::new(&settings);
        let mut resolver = AffinityResolver::new();

        assert!(extractor(0)
            .extract(&world, &world.regions[&region], true, &policy, &mut resolver)
            .is_empty());
    }
}
