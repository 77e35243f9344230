//! Simulation mechanics: time units, lifecycle states and classifications.

use serde::{Deserialize, Serialize};

/// Ticks in one in-game day.
pub const TICKS_PER_DAY: i64 = 60_000;

/// Ticks in one in-game hour.
pub const TICKS_PER_HOUR: i64 = TICKS_PER_DAY / 24;

/// Lifecycle state of a narrative task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskState {
    /// Offered but not yet accepted.
    #[default]
    NotYetAccepted,
    Ongoing,
    Ended,
}

/// Classification of sub-parts by what they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubPartKind {
    ActorPresence,
    Site,
    RegionEffect,
    Timer,
    RewardDelivery,
    DropOff,
    AcceptanceRequirement,
    Notification,
    Choice,
    Other,
}

/// Sub-part kinds whose spatial references do not mean the task happens there.
pub const NON_LOCATIONAL_KINDS: &[SubPartKind] = &[
    SubPartKind::RewardDelivery,
    SubPartKind::DropOff,
    SubPartKind::AcceptanceRequirement,
    SubPartKind::Notification,
    SubPartKind::Choice,
];

impl SubPartKind {
    /// Check membership in [`NON_LOCATIONAL_KINDS`].
    pub fn is_non_locational(&self) -> bool {
        NON_LOCATIONAL_KINDS.contains(self)
    }
}

/// Classification of entries in the alert log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertClass {
    ThreatBig,
    ThreatSmall,
    Negative,
    Neutral,
    Positive,
}

impl AlertClass {
    /// Raids, sieges and other red alerts.
    pub fn is_threat(&self) -> bool {
        matches!(self, AlertClass::ThreatBig | AlertClass::ThreatSmall)
    }

    /// Stable string tag, also used as the alert's source type id.
    pub fn tag(&self) -> &'static str {
        match self {
            AlertClass::ThreatBig => "ThreatBig",
            AlertClass::ThreatSmall => "ThreatSmall",
            AlertClass::Negative => "NegativeEvent",
            AlertClass::Neutral => "NeutralEvent",
            AlertClass::Positive => "PositiveEvent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_per_hour() {
        assert_eq!(TICKS_PER_HOUR, 2_500);
    }

    #[test]
    fn test_exclusion_list() {
        assert!(SubPartKind::RewardDelivery.is_non_locational());
        assert!(SubPartKind::Choice.is_non_locational());
        assert!(!SubPartKind::Site.is_non_locational());
        assert!(!SubPartKind::Other.is_non_locational());
    }

    #[test]
    fn test_threat_classes() {
        assert!(AlertClass::ThreatBig.is_threat());
        assert!(AlertClass::ThreatSmall.is_threat());
        assert!(!AlertClass::Negative.is_threat());
        assert_eq!(AlertClass::ThreatSmall.tag(), "ThreatSmall");
    }
}
