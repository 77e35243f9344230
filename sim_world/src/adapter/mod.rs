//! Host document adapter.
//!
//! Translates the host's JSON dump into a [`WorldState`]. Top-level structure
//! is strict; task sub-parts are read field by field because their shape
//! drifts between host versions. A sub-part field that cannot be read is
//! treated as absent.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::entities::{
    Actor, ActorId, NarrativeTask, PlaceRef, SubPart, TaskTarget, TileId, WorldObjectId,
};
use crate::error::AdapterError;
use crate::mechanics::{AlertClass, TaskState};
use crate::rules::RulePack;
use crate::world_state::{
    Alert, EnvironmentCondition, Region, RegionId, SiteFeature, TaskId, WorldState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    ticks_game: i64,
    #[serde(default)]
    colony_id: Option<String>,
    #[serde(default)]
    language: String,
    #[serde(default)]
    maps: Vec<RawMap>,
    #[serde(default)]
    quests: Vec<RawQuest>,
    #[serde(default)]
    pawns: Vec<RawPawn>,
    #[serde(default)]
    archive: Vec<RawLetter>,
    #[serde(default)]
    rule_packs: HashMap<String, HashMap<String, Vec<String>>>,
    #[serde(default)]
    quest_script_defs: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMap {
    unique_id: RegionId,
    #[serde(default)]
    label: String,
    is_player_home: bool,
    #[serde(default)]
    parent: Option<WorldObjectId>,
    #[serde(default)]
    tile: Option<i32>,
    #[serde(default)]
    site_parts: Vec<RawDef>,
    #[serde(default)]
    conditions: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDef {
    def_name: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCondition {
    def_name: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_true")]
    display_on_ui: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuest {
    id: TaskId,
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    is_root_special: bool,
    #[serde(default)]
    acceptance_tick: Option<i64>,
    #[serde(default)]
    look_targets: Vec<RawTarget>,
    #[serde(default)]
    parts: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    #[serde(default)]
    map: Option<RegionId>,
    #[serde(default)]
    world_object: Option<WorldObjectId>,
    #[serde(default)]
    tile: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPawn {
    id: ActorId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    name_short: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLetter {
    letter_def: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    tooltip: String,
    #[serde(default)]
    created_ticks: Option<i64>,
}

/// Parse a host JSON document into a world state.
pub fn world_from_json(json: &str) -> Result<WorldState, AdapterError> {
    let raw: RawDocument = serde_json::from_str(json)?;
    let mut state = WorldState::new();

    state.tick = raw.ticks_game;
    state.scope_id = raw.colony_id;
    state.language = raw.language;

    for map in raw.maps {
        let region_id = map.unique_id;
        let mut region = Region {
            id: region_id,
            name: map.label,
            is_home: map.is_player_home,
            parent: map.parent,
            tile: map.tile.map(TileId),
            site_features: Vec::new(),
        };
        for part in map.site_parts {
            region.site_features.push(SiteFeature {
                label: if part.label.is_empty() {
                    part.def_name.clone()
                } else {
                    part.label
                },
                type_id: part.def_name,
                description: part.description,
            });
        }
        state.add_region(region);

        for cond in map.conditions {
            let mut condition = EnvironmentCondition::new(cond.def_name, cond.label)
                .with_description(cond.description);
            condition.user_visible = cond.display_on_ui;
            state.add_condition(region_id, condition);
        }
    }

    for pawn in raw.pawns {
        let mut actor = Actor::new(pawn.name);
        actor.id = pawn.id;
        actor.short_name = pawn.name_short;
        state.add_actor(actor);
    }

    for quest in raw.quests {
        state.add_task(translate_quest(quest));
    }

    for letter in raw.archive {
        let Some(class) = alert_class(&letter.letter_def) else {
            continue;
        };
        let mut alert = Alert::new(class, letter.label).with_tooltip(letter.tooltip);
        alert.created_tick = letter.created_ticks;
        state.push_alert(alert);
    }

    for (language, packs) in raw.rule_packs {
        for (type_id, lines) in packs {
            state.add_rule_pack(language.clone(), type_id, RulePack::new(lines));
        }
    }

    state.known_task_types.extend(raw.quest_script_defs);

    Ok(state)
}

/// Attach conditions to an already-declared region.
pub fn add_conditions(
    state: &mut WorldState,
    region: RegionId,
    conditions: Vec<EnvironmentCondition>,
) -> Result<(), AdapterError> {
    if !state.regions.contains_key(&region) {
        return Err(AdapterError::UnknownRegion(region));
    }
    for condition in conditions {
        state.add_condition(region, condition);
    }
    Ok(())
}

fn alert_class(letter_def: &str) -> Option<AlertClass> {
    match letter_def {
        "ThreatBig" => Some(AlertClass::ThreatBig),
        "ThreatSmall" => Some(AlertClass::ThreatSmall),
        "NegativeEvent" => Some(AlertClass::Negative),
        "NeutralEvent" => Some(AlertClass::Neutral),
        "PositiveEvent" => Some(AlertClass::Positive),
        _ => None,
    }
}

fn task_state(state: Option<&str>) -> TaskState {
    match state {
        Some("Ongoing") => TaskState::Ongoing,
        Some("EndedSuccess") | Some("EndedFailed") | Some("EndedOfferExpired")
        | Some("EndedUnknownOutcome") | Some("EndedInvalid") | Some("Ended") => TaskState::Ended,
        _ => TaskState::NotYetAccepted,
    }
}

fn translate_quest(quest: RawQuest) -> NarrativeTask {
    NarrativeTask {
        id: quest.id,
        type_id: quest.root,
        name: quest.name,
        description: quest.description,
        state: task_state(quest.state.as_deref()),
        hidden: quest.hidden,
        root_special: quest.is_root_special,
        accepted_tick: quest.acceptance_tick.filter(|t| *t > 0),
        targets: quest
            .look_targets
            .into_iter()
            .map(|t| TaskTarget {
                region: t.map,
                parent: t.world_object,
                tile: t.tile.map(TileId),
            })
            .collect(),
        parts: quest.parts.iter().map(translate_part).collect(),
    }
}

/// Translate one raw sub-part. Field reads never fail the whole part.
fn translate_part(raw: &Value) -> SubPart {
    let class = raw
        .get("class")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // Only the owning-object fields; the threat-scaling reference is ignored.
    let place = PlaceRef {
        region: read_id(raw, &["map", "Map"]).map(RegionId),
        parent: read_id(raw, &["mapParent", "MapParent"]).map(WorldObjectId),
    };
    let actor = read_id(raw, &["pawn"]).map(ActorId);
    let actors = read_id_list(raw, "pawns")
        .into_iter()
        .map(ActorId)
        .collect::<Vec<_>>();

    match class.as_str() {
        "QuestPart_DropPods" => SubPart::DropOff { place },
        c if c.starts_with("QuestPart_RequirementsToAccept") => {
            SubPart::AcceptanceRequirement { place }
        }
        "QuestPart_GiveRewards" | "QuestPart_DeliverRewards" => SubPart::RewardDelivery { place },
        "QuestPart_Letter" | "QuestPart_Message" => SubPart::Notification { actor },
        "QuestPart_Choice" => SubPart::Choice { actors },
        "QuestPart_Delay" | "QuestPart_Timer" => SubPart::Timer {
            duration_ticks: raw.get("delayTicks").and_then(Value::as_i64),
        },
        "QuestPart_SpawnWorldObject" | "QuestPart_SiteRemoval" => SubPart::Site { place },
        "QuestPart_GameCondition" | "QuestPart_Incident" => SubPart::RegionEffect { place },
        _ if place != PlaceRef::default() || actor.is_some() || !actors.is_empty() => {
            SubPart::ActorPresence {
                actor,
                actors,
                place,
            }
        }
        _ => SubPart::Other { type_name: class },
    }
}

fn read_id(raw: &Value, names: &[&str]) -> Option<Uuid> {
    for name in names {
        let Some(value) = raw.get(*name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match value.as_str().map(Uuid::from_str) {
            Some(Ok(id)) => return Some(id),
            _ => tracing::warn!("Ignoring unreadable sub-part field {}: {}", name, value),
        }
    }
    None
}

fn read_id_list(raw: &Value, name: &str) -> Vec<Uuid> {
    let Some(value) = raw.get(name) else {
        return Vec::new();
    };
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|v| v.as_str().and_then(|s| Uuid::from_str(s).ok()))
            .collect(),
        None => {
            if !value.is_null() {
                tracing::warn!("Ignoring unreadable sub-part list {}: {}", name, value);
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::SimulationHost;

    const REGION: &str = "6f1c2b1e-0000-4000-8000-000000000001";
    const SITE: &str = "6f1c2b1e-0000-4000-8000-000000000002";
    const QUEST: &str = "6f1c2b1e-0000-4000-8000-000000000003";
    const PAWN: &str = "6f1c2b1e-0000-4000-8000-000000000004";

    fn sample_document() -> String {
        format!(
            r#"{{
                "ticksGame": 120000,
                "colonyId": "colony-1",
                "language": "English",
                "maps": [{{
                    "uniqueId": "{REGION}",
                    "label": "Ruins",
                    "isPlayerHome": false,
                    "parent": "{SITE}",
                    "tile": 42,
                    "siteParts": [{{ "defName": "AncientMercs", "label": "ancient mercenaries" }}],
                    "conditions": [{{ "defName": "HeatWave", "label": "Heat Wave", "displayOnUI": true }}]
                }}],
                "quests": [{{
                    "id": "{QUEST}",
                    "root": "Hospitality_Refugee",
                    "name": "Refugee request",
                    "state": "Ongoing",
                    "acceptanceTick": 60000,
                    "parts": [
                        {{ "class": "QuestPart_DropPods", "mapParent": "{SITE}" }},
                        {{ "class": "QuestPart_Lodgers", "pawn": "{PAWN}", "mapParent": 17 }},
                        {{ "class": "QuestPart_Delay", "delayTicks": 30000 }},
                        {{ "class": "QuestPart_Noop" }}
                    ]
                }}],
                "pawns": [{{ "id": "{PAWN}", "name": "Ada Lovelace", "nameShort": "Ada" }}],
                "archive": [{{ "letterDef": "ThreatBig", "label": "Raid", "createdTicks": 110000 }}],
                "rulePacks": {{ "English": {{ "Hospitality_Refugee": ["questDescription->[claimInfo]"] }} }},
                "questScriptDefs": ["Hospitality_Refugee", "OpportunitySite"]
            }}"#
        )
    }

    #[test]
    fn test_translate_document() {
        let state = world_from_json(&sample_document()).expect("valid document");

        assert_eq!(state.current_tick(), 120_000);
        assert_eq!(state.scope_id(), Some("colony-1"));
        assert_eq!(state.regions.len(), 1);
        assert_eq!(state.alerts.len(), 1);
        assert!(state.knows_task_type("OpportunitySite"));
        assert!(state.description_rules("Hospitality_Refugee").is_some());

        let region = state.regions.values().next().expect("one region");
        assert_eq!(region.site_features[0].label, "ancient mercenaries");
        assert_eq!(state.conditions(region.id).len(), 1);
    }

    #[test]
    fn test_part_classification() {
        let state = world_from_json(&sample_document()).expect("valid document");
        let task = &state.tasks[0];

        assert!(task.is_ongoing());
        assert!(matches!(task.parts[0], SubPart::DropOff { .. }));
        assert!(matches!(task.parts[2], SubPart::Timer { duration_ticks: Some(30_000) }));
        assert!(matches!(task.parts[3], SubPart::Other { .. }));
    }

    #[test]
    fn test_unreadable_field_treated_as_absent() {
        let state = world_from_json(&sample_document()).expect("valid document");
        let lodgers = &state.tasks[0].parts[1];

        // `mapParent` was a number; the part survives with only its actor.
        match lodgers {
            SubPart::ActorPresence { actor, place, .. } => {
                assert!(actor.is_some());
                assert_eq!(place.parent, None);
            }
            other => panic!("unexpected part {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document() {
        let err = world_from_json("{ \"maps\": [] }").unwrap_err();
        assert!(matches!(err, AdapterError::Malformed(_)));
    }

    #[test]
    fn test_conditions_for_unknown_region() {
        let mut state = WorldState::new();
        let err = add_conditions(&mut state, RegionId::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, AdapterError::UnknownRegion(_)));
    }
}
