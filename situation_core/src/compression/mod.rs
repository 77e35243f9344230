//! Compression Engine - shrinks verbose generated descriptions into compact
//! templates while keeping the dynamic facts.
//!
//! 1. **Base body**: structured description, else the generic body
//! 2. **Template**: compact template for (source type, kind), else kind-agnostic
//! 3. **Anchored tokens**: slice the body between the literals that surround
//!    the token in the host's description rule
//! 4. **Clause tokens**: longest full match among the rule alternatives,
//!    literals escaped and tokens as lazy wildcards
//! 5. **Substitution**: fill the template, leaving unresolved tokens verbatim
//!
//! Every failure falls back toward the uncompressed body.

mod segments;
mod templates;

pub use segments::*;
pub use templates::*;

use sim_world::{RulePack, SimulationHost};
use std::collections::HashMap;

use crate::error::CompressionError;
use crate::snapshot::SituationSnapshot;

/// Applies a [`TemplateLibrary`] to snapshots.
#[derive(Debug, Clone, Default)]
pub struct CompressionEngine {
    library: TemplateLibrary,
}

impl CompressionEngine {
    pub fn new(library: TemplateLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut TemplateLibrary {
        &mut self.library
    }

    /// Compressed body for a snapshot, or its base body when nothing applies.
    pub fn compress(&self, snapshot: &SituationSnapshot, host: &dyn SimulationHost) -> String {
        let base = snapshot.base_body();
        if base.is_empty() {
            return String::new();
        }

        let Some(source) = snapshot.source_type_id.as_deref().filter(|s| !s.is_empty()) else {
            return base.to_string();
        };

        let Some(template) = self
            .library
            .lookup(source, &snapshot.kind)
            .filter(|t| !t.compressed_body.is_empty())
        else {
            return base.to_string();
        };

        let values = self.extract_values(source, &snapshot.kind, base, host);
        let compressed = fill_template(&template.compressed_body, &values);
        if compressed.is_empty() {
            base.to_string()
        } else {
            compressed
        }
    }

    /// Dynamic values recoverable from `body` for this source type.
    pub fn extract_values(
        &self,
        source_type_id: &str,
        kind: &str,
        body: &str,
        host: &dyn SimulationHost,
    ) -> HashMap<String, String> {
        let mut values = HashMap::new();

        let Some(rule) = self.library.extraction_rule(source_type_id, kind) else {
            return values;
        };
        let Some(pack) = host.description_rules(source_type_id) else {
            tracing::debug!("No description rules for {}, skipping extraction", source_type_id);
            return values;
        };

        for anchored in &rule.anchored {
            match extract_anchored(pack, anchored, body) {
                Ok(value) => {
                    values.insert(anchored.token.clone(), value);
                }
                Err(e) => {
                    tracing::debug!("Skipped [{}] for {}: {}", anchored.token, source_type_id, e);
                }
            }
        }

        for clause in &rule.clauses {
            if let Some(value) = longest_clause_match(pack, &clause.rule_prefix, body) {
                values.insert(clause.token.clone(), value);
            }
        }

        values
    }
}

fn extract_anchored(
    pack: &RulePack,
    rule: &TokenRule,
    body: &str,
) -> Result<String, CompressionError> {
    let output = pack
        .first_output_with_prefix(&rule.rule_prefix)
        .ok_or_else(|| CompressionError::MissingRule(rule.rule_prefix.clone()))?;

    let segments = parse_segments(&output);
    let (before, after) = neighbor_literals(&segments, &rule.token)?;

    extract_between(body, before, after)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CompressionError::AnchorsNotInText(rule.token.clone()))
}

/// The longest text matched by any rule whose key starts with `prefix`.
///
/// A later alternative replaces the current best only when strictly longer.
pub fn longest_clause_match(pack: &RulePack, prefix: &str, body: &str) -> Option<String> {
    let mut best: Option<&str> = None;

    for entry in pack.entries().iter().filter(|e| e.key.starts_with(prefix)) {
        let pattern = match wildcard_pattern(&entry.output) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::debug!("Skipped rule {}: {}", entry.key, e);
                continue;
            }
        };

        if let Some(found) = pattern.find(body) {
            let text = found.as_str();
            let best_len = best.map_or(0, |b| b.chars().count());
            if text.chars().count() > best_len {
                best = Some(text);
            }
        }
    }

    best.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
