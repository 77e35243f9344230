//! The bracket-token micro-language shared by host rule outputs and compact
//! templates: `literal [token] literal`.

use regex::Regex;
use std::collections::HashMap;

use crate::error::CompressionError;

/// One piece of a bracket-token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Token(String),
}

impl Segment {
    pub fn is_token(&self) -> bool {
        matches!(self, Segment::Token(_))
    }
}

/// Split a string into literal and `[token]` segments.
///
/// An unclosed `[` turns the rest of the string into a literal. Empty
/// literals are never produced.
pub fn parse_segments(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(open) = rest.find('[') {
        literal.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find(']') else {
            literal.push_str(&rest[open..]);
            rest = "";
            break;
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Token(after_open[..close].to_string()));
        rest = &after_open[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Nearest non-empty literals on each side of the first occurrence of `token`.
pub fn neighbor_literals<'a>(
    segments: &'a [Segment],
    token: &str,
) -> Result<(&'a str, &'a str), CompressionError> {
    let index = segments
        .iter()
        .position(|s| matches!(s, Segment::Token(name) if name == token))
        .ok_or_else(|| CompressionError::TokenNotFound(token.to_string()))?;

    let literal = |s: &'a Segment| match s {
        Segment::Literal(text) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    };

    let before = segments[..index].iter().rev().find_map(literal);
    let after = segments[index + 1..].iter().find_map(literal);

    match (before, after) {
        (Some(before), Some(after)) => Ok((before, after)),
        _ => Err(CompressionError::MissingAnchor(token.to_string())),
    }
}

/// The text between the first `before` and the next `after` that follows it.
///
/// An empty span counts as not found.
pub fn extract_between<'t>(
    text: &'t str,
    before: &str,
    after: &str,
) -> Option<&'t str> {
    let start = text.find(before)? + before.len();
    let tail = text.get(start..).filter(|t| !t.is_empty())?;
    let end = tail.find(after).filter(|&e| e > 0)?;
    Some(&tail[..end])
}

/// A regex matching text generated from `template`: literals escaped, each
/// token a lazy wildcard. `.` also matches newlines.
pub fn wildcard_pattern(template: &str) -> Result<Regex, CompressionError> {
    let pattern: String = parse_segments(template)
        .iter()
        .map(|seg| match seg {
            Segment::Token(_) => "(.+?)".to_string(),
            Segment::Literal(text) => regex::escape(text),
        })
        .collect();

    if pattern.is_empty() {
        return Err(CompressionError::EmptyTemplate);
    }
    Ok(Regex::new(&format!("(?s){pattern}"))?)
}

/// Substitute known tokens; anything else stays as `[name]`.
pub fn fill_template(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    for seg in parse_segments(template) {
        match seg {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Token(name) => match values.get(&name).filter(|v| !v.is_empty()) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('[');
                    out.push_str(&name);
                    out.push(']');
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let segs = parse_segments("[approachInfo] will stay for [questDurationTicks_duration].");
        assert_eq!(
            segs,
            vec![
                Segment::Token("approachInfo".into()),
                Segment::Literal(" will stay for ".into()),
                Segment::Token("questDurationTicks_duration".into()),
                Segment::Literal(".".into()),
            ]
        );
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let segs = parse_segments("a [b] c [unclosed");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2], Segment::Literal(" c [unclosed".into()));
    }

    #[test]
    fn test_neighbor_literals() {
        let segs = parse_segments("[a][claimInfo] They will stay for [dur].\n[b]");
        let (before, after) = neighbor_literals(&segs, "dur").unwrap();
        assert_eq!(before, " They will stay for ");
        assert_eq!(after, ".\n");

        assert!(matches!(
            neighbor_literals(&segs, "a"),
            Err(CompressionError::MissingAnchor(_))
        ));
        assert!(matches!(
            neighbor_literals(&segs, "missing"),
            Err(CompressionError::TokenNotFound(_))
        ));
    }

    #[test]
    fn test_extract_between() {
        let text = "Ada needs shelter. They will stay for 12 days. Accept?";
        assert_eq!(extract_between(text, "stay for ", "."), Some("12 days"));
        assert_eq!(extract_between(text, "nowhere", "."), None);
        assert_eq!(extract_between("stay for .", "stay for ", "."), None);
    }

    #[test]
    fn test_wildcard_pattern_escapes_literals() {
        let re = wildcard_pattern("[name] (a refugee) needs [thing].").unwrap();
        let m = re.find("Intro. Ada (a refugee) needs shelter\nsoon. Outro").unwrap();
        assert_eq!(m.as_str(), "Intro. Ada (a refugee) needs shelter\nsoon.");

        assert!(matches!(wildcard_pattern(""), Err(CompressionError::EmptyTemplate)));
    }

    #[test]
    fn test_fill_template_keeps_unknown_tokens() {
        let values = HashMap::from([("claimInfo".to_string(), "Ada needs shelter".to_string())]);
        let out = fill_template("[claimInfo] The job will take [questDurationTicks_duration].", &values);
        assert_eq!(out, "Ada needs shelter The job will take [questDurationTicks_duration].");
    }
}
