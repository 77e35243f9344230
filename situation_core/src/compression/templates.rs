//! Author data for compression: compact templates and per-type extraction rules.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::snapshot::TASK_KIND;

/// A short replacement body with `[token]` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionTemplate {
    pub source_type_id: String,
    /// Absent or empty matches any kind.
    #[serde(default)]
    pub kind: Option<String>,
    pub compressed_body: String,
}

impl CompressionTemplate {
    pub fn new(source_type_id: impl Into<String>, compressed_body: impl Into<String>) -> Self {
        Self {
            source_type_id: source_type_id.into(),
            kind: None,
            compressed_body: compressed_body.into(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Names a token and the description rules it is recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    pub token: String,
    /// Rules whose key starts with this prefix are consulted.
    pub rule_prefix: String,
}

impl TokenRule {
    pub fn new(token: impl Into<String>, rule_prefix: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            rule_prefix: rule_prefix.into(),
        }
    }
}

/// How to recover dynamic values for one source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    pub source_type_id: String,
    #[serde(default)]
    pub kind: Option<String>,
    /// Tokens sliced out of the body between their neighbouring literals.
    #[serde(default)]
    pub anchored: Vec<TokenRule>,
    /// Tokens whose value is the longest full match of any rule alternative.
    #[serde(default, rename = "clause")]
    pub clauses: Vec<TokenRule>,
}

/// All templates and extraction rules known to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    #[serde(default, rename = "template")]
    pub templates: Vec<CompressionTemplate>,
    #[serde(default, rename = "extraction")]
    pub extractions: Vec<ExtractionRule>,
}

impl Default for TemplateLibrary {
    /// The built-in extraction rules, no templates.
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            extractions: builtin_extractions(),
        }
    }
}

fn builtin_extractions() -> Vec<ExtractionRule> {
    vec![ExtractionRule {
        source_type_id: "Hospitality_Refugee".to_string(),
        kind: Some(TASK_KIND.to_string()),
        anchored: vec![TokenRule::new("questDurationTicks_duration", "questDescription")],
        clauses: vec![TokenRule::new("claimInfo", "claimInfo")],
    }]
}

impl TemplateLibrary {
    /// A library with nothing registered.
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
            extractions: Vec::new(),
        }
    }

    /// Loads author data from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Add entries from `other` after this library's own.
    pub fn merge(&mut self, other: TemplateLibrary) {
        self.templates.extend(other.templates);
        self.extractions.extend(other.extractions);
    }

    pub fn add_template(&mut self, template: CompressionTemplate) {
        self.templates.push(template);
    }

    pub fn add_extraction(&mut self, rule: ExtractionRule) {
        self.extractions.push(rule);
    }

    /// Template for a source type, preferring one declared for this kind.
    pub fn lookup(&self, source_type_id: &str, kind: &str) -> Option<&CompressionTemplate> {
        find_for_kind(
            &self.templates,
            source_type_id,
            kind,
            |t| (&t.source_type_id, t.kind.as_deref()),
        )
    }

    pub fn extraction_rule(&self, source_type_id: &str, kind: &str) -> Option<&ExtractionRule> {
        find_for_kind(
            &self.extractions,
            source_type_id,
            kind,
            |r| (&r.source_type_id, r.kind.as_deref()),
        )
    }
}

impl FromStr for TemplateLibrary {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Case-insensitive match on source type; an exact kind wins over the first
/// kind-agnostic entry.
fn find_for_kind<'a, T>(
    items: &'a [T],
    source_type_id: &str,
    kind: &str,
    key: impl Fn(&T) -> (&String, Option<&str>),
) -> Option<&'a T> {
    if source_type_id.is_empty() {
        return None;
    }

    let mut fallback = None;
    for item in items {
        let (source, item_kind) = key(item);
        if source.is_empty() || !source.eq_ignore_ascii_case(source_type_id) {
            continue;
        }
        match item_kind.filter(|k| !k.is_empty()) {
            None => {
                fallback.get_or_insert(item);
            }
            Some(k) if k.eq_ignore_ascii_case(kind) => return Some(item),
            Some(_) => {}
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_prefers_kind_specific() {
        let mut lib = TemplateLibrary::empty();
        lib.add_template(CompressionTemplate::new("RaidEnemy", "generic"));
        lib.add_template(CompressionTemplate::new("raidenemy", "specific").with_kind("threatbig"));

        assert_eq!(lib.lookup("RaidEnemy", "ThreatBig").unwrap().compressed_body, "specific");
        assert_eq!(lib.lookup("RaidEnemy", "Quest").unwrap().compressed_body, "generic");
        assert!(lib.lookup("Other", "Quest").is_none());
        assert!(lib.lookup("", "Quest").is_none());
    }

    #[test]
    fn test_default_has_refugee_rule() {
        let lib = TemplateLibrary::default();
        let rule = lib.extraction_rule("Hospitality_Refugee", "Quest").unwrap();

        assert_eq!(rule.anchored[0].token, "questDurationTicks_duration");
        assert_eq!(rule.clauses[0].rule_prefix, "claimInfo");
        assert!(lib.templates.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
[[template]]
source_type_id = "Hospitality_Refugee"
kind = "Quest"
compressed_body = "[claimInfo] The job will take [questDurationTicks_duration]."

[[extraction]]
source_type_id = "BFA_FallenAngel"

[[extraction.clause]]
token = "angelInfo"
rule_prefix = "angelInfo"
"#;
        let lib: TemplateLibrary = toml.parse().unwrap();

        assert_eq!(lib.templates.len(), 1);
        assert_eq!(lib.extractions[0].clauses[0].token, "angelInfo");
        assert!(lib.extractions[0].anchored.is_empty());
    }

    #[test]
    fn test_merge_keeps_builtins() {
        let mut lib = TemplateLibrary::default();
        let mut extra = TemplateLibrary::empty();
        extra.add_template(CompressionTemplate::new("X", "short"));

        lib.merge(extra);

        assert_eq!(lib.templates.len(), 1);
        assert_eq!(lib.extractions.len(), 1);
    }
}
