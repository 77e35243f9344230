//! Generation rule packs as exposed by the host.
//!
//! The host generates task descriptions from per-language rule packs. Each
//! raw rule is a `key->output` line where the output mixes literal text with
//! bracketed `[token]` references to other rules.

use serde::{Deserialize, Serialize};

/// One parsed `key->output` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStringEntry {
    /// Left side, possibly parameterized, e.g. `claimInfo(lodgerCount>=2)`.
    pub key: String,
    /// Right side, kept verbatim including tokens.
    pub output: String,
}

impl RuleStringEntry {
    /// Parse a raw rule line. Returns `None` for lines without `->` or with an
    /// empty side.
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, output) = raw.split_once("->")?;
        let key = key.trim();
        if key.is_empty() || output.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            output: output.to_string(),
        })
    }
}

/// The raw rules for one task type in one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePack {
    #[serde(default)]
    pub rules_strings: Vec<String>,
}

impl RulePack {
    /// Create a rule pack from raw lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules_strings: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// All well-formed entries, in declaration order.
    pub fn entries(&self) -> Vec<RuleStringEntry> {
        self.rules_strings
            .iter()
            .filter_map(|raw| RuleStringEntry::parse(raw))
            .collect()
    }

    /// Output of the first rule whose key starts with `prefix`.
    pub fn first_output_with_prefix(&self, prefix: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|e| e.key.starts_with(prefix))
            .map(|e| e.output)
    }
}
