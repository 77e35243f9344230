//! Renders snapshots into the text block handed to dialogue generation.

use sim_world::SimulationHost;

use crate::compression::CompressionEngine;
use crate::snapshot::SituationSnapshot;

pub const BLOCK_HEADER: &str = "[Ongoing events]";
pub const BLOCK_FOOTER: &str = "[Event list end]";

/// Bodies longer than this many characters are cut and get an ellipsis.
pub const MAX_BODY_CHARS: usize = 600;

const BODY_INDENT: &str = "   ";

/// Pure renderer: the same snapshots always produce the same block.
#[derive(Clone, Copy, Default)]
pub struct Formatter<'a> {
    compression: Option<(&'a CompressionEngine, &'a dyn SimulationHost)>,
}

impl<'a> Formatter<'a> {
    /// A formatter that prints bodies as extracted.
    pub fn new() -> Self {
        Self { compression: None }
    }

    /// A formatter that compresses bodies of snapshots with a source type.
    pub fn with_compression(engine: &'a CompressionEngine, host: &'a dyn SimulationHost) -> Self {
        Self {
            compression: Some((engine, host)),
        }
    }

    /// Render the block. Entities stop being added once the text written so
    /// far exceeds `max_chars`; markers are always present.
    pub fn format(&self, snapshots: &[SituationSnapshot], max_chars: usize) -> String {
        let mut out = String::new();
        out.push_str(BLOCK_HEADER);
        out.push('\n');

        for (index, snapshot) in snapshots.iter().enumerate() {
            if out.chars().count() > max_chars {
                break;
            }

            let label = strip_tags(&snapshot.label);
            let body = truncate_body(&strip_tags(&self.body_for(snapshot)));

            out.push('\n');
            out.push_str(&format!("{}) ", index + 1));
            out.push_str(if label.is_empty() { "(no title)" } else { &label });
            out.push('\n');

            if !body.is_empty() {
                out.push_str(BODY_INDENT);
                out.push_str(&body.replace('\n', &format!("\n{BODY_INDENT}")));
                out.push('\n');
            }
        }

        out.push('\n');
        out.push_str(BLOCK_FOOTER);
        out.push('\n');
        out
    }

    fn body_for(&self, snapshot: &SituationSnapshot) -> String {
        let base = snapshot.base_body();
        let has_source = snapshot.source_type_id.as_deref().is_some_and(|s| !s.is_empty());

        match self.compression {
            Some((engine, host)) if has_source => {
                let compressed = engine.compress(snapshot, host);
                if compressed.is_empty() {
                    base.to_string()
                } else {
                    compressed
                }
            }
            _ => base.to_string(),
        }
    }
}

impl std::fmt::Debug for Formatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("compression", &self.compression.is_some())
            .finish()
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let mut cut: String = body.chars().take(MAX_BODY_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Remove `<color=...>` and `</color>` markup, case-insensitively.
///
/// An opening tag with no closing `>` is left in place.
pub fn strip_tags(input: &str) -> String {
    const CLOSE: &str = "</color>";
    const OPEN: &str = "<color";

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        // ASCII lowercasing keeps byte offsets aligned with `rest`.
        let lower = rest.to_ascii_lowercase();
        let close = lower.find(CLOSE);
        let open = lower.find(OPEN);

        let (start, end) = match (open, close) {
            (Some(o), Some(c)) if c < o => (c, c + CLOSE.len()),
            (Some(o), _) => match lower[o..].find('>') {
                Some(gt) => (o, o + gt + 1),
                None => match close {
                    Some(c) => (c, c + CLOSE.len()),
                    None => break,
                },
            },
            (None, Some(c)) => (c, c + CLOSE.len()),
            (None, None) => break,
        };

        out.push_str(&rest[..start]);
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TASK_KIND;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<color=#FF0000>Raid</color> incoming"), "Raid incoming");
        assert_eq!(strip_tags("<COLOR=red>a</Color>b"), "ab");
        assert_eq!(strip_tags("plain <b>bold</b>"), "plain <b>bold</b>");
        assert_eq!(strip_tags("broken <color=red"), "broken <color=red");
    }

    #[test]
    fn test_block_layout() {
        let snaps = vec![
            SituationSnapshot::new("GameCondition_HeatWave", "Heat wave").with_body("Hot.\nVery hot."),
            SituationSnapshot::new(TASK_KIND, ""),
        ];

        let out = Formatter::new().format(&snaps, 1200);

        assert_eq!(
            out,
            "[Ongoing events]\n\n1) Heat wave\n   Hot.\n   Very hot.\n\n2) (no title)\n\n[Event list end]\n"
        );
    }

    #[test]
    fn test_empty_list_keeps_markers() {
        assert_eq!(Formatter::new().format(&[], 1200), "[Ongoing events]\n\n[Event list end]\n");
    }

    #[test]
    fn test_long_body_truncated() {
        let long = "x".repeat(700);
        let snaps = vec![SituationSnapshot::new(TASK_KIND, "Long").with_body(long)];

        let out = Formatter::new().format(&snaps, 5000);

        assert!(out.contains(&format!("   {}...\n", "x".repeat(600))));
        assert!(!out.contains(&"x".repeat(601)));
    }

    #[test]
    fn test_budget_stops_after_overflow() {
        let snaps: Vec<_> = (0..5)
            .map(|i| SituationSnapshot::new(TASK_KIND, format!("Entity {i}")).with_body("y".repeat(50)))
            .collect();

        let out = Formatter::new().format(&snaps, 100);

        assert!(out.contains("1) Entity 0"));
        assert!(out.contains("2) Entity 1"));
        assert!(!out.contains("3) Entity 2"));
        assert!(out.ends_with("[Event list end]\n"));
    }

    #[test]
    fn test_format_is_repeatable() {
        let snaps = vec![SituationSnapshot::new(TASK_KIND, "<color=red>Refugee</color>").with_body("b")];
        let formatter = Formatter::new();

        assert_eq!(formatter.format(&snaps, 100), formatter.format(&snaps, 100));
    }
}
