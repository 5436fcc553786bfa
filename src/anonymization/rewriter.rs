//! Text substitution in both directions
//!
//! Anonymization replaces every literal occurrence of each detected value.
//! Values are applied in descending order of their first occurrence (longer
//! first on ties), and text already turned into a placeholder during the
//! same call is never rewritten again. When one detected value is a
//! substring of another, the order decides which one claims the shared text.
//!
//! Restoration scans for both placeholder shapes and splices originals back
//! from right to left, leaving unknown tokens untouched.

use crate::anonymization::mapping::PiiMapping;
use crate::domain::{AnonymizerError, Result};
use regex::Regex;

enum Segment<'a> {
    /// Untouched byte range of the source text
    Source(usize, usize),
    Placeholder(&'a str),
}

/// Replace each `(value, placeholder)` pair globally in `text`
///
/// Semantic aliases are word-shaped, so they only replace occurrences that
/// are not glued to other word characters; otherwise the alias could not be
/// found again on restore.
pub fn substitute(text: &str, replacements: &[(String, String)]) -> String {
    let mut ordered: Vec<(usize, &str, &str)> = replacements
        .iter()
        .filter(|(value, _)| !value.is_empty())
        .filter_map(|(value, placeholder)| {
            text.find(value.as_str())
                .map(|first| (first, value.as_str(), placeholder.as_str()))
        })
        .collect();
    ordered.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.len().cmp(&a.1.len())));
    ordered.dedup_by(|a, b| a.1 == b.1);

    let mut segments = vec![Segment::Source(0, text.len())];
    for (_, value, placeholder) in ordered {
        let word_bounded = !placeholder.starts_with('<');
        segments = segments
            .into_iter()
            .flat_map(|segment| split_segment(text, segment, value, placeholder, word_bounded))
            .collect();
    }

    segments
        .iter()
        .map(|segment| match segment {
            Segment::Source(start, end) => &text[*start..*end],
            Segment::Placeholder(placeholder) => *placeholder,
        })
        .collect()
}

fn split_segment<'a>(
    text: &str,
    segment: Segment<'a>,
    value: &str,
    placeholder: &'a str,
    word_bounded: bool,
) -> Vec<Segment<'a>> {
    let Segment::Source(seg_start, seg_end) = segment else {
        return vec![segment];
    };

    let mut parts = Vec::new();
    let mut cursor = seg_start;
    for (offset, _) in text[seg_start..seg_end].match_indices(value) {
        let start = seg_start + offset;
        let end = start + value.len();
        if word_bounded && !is_word_bounded(text, start, end) {
            continue;
        }
        if cursor < start {
            parts.push(Segment::Source(cursor, start));
        }
        parts.push(Segment::Placeholder(placeholder));
        cursor = end;
    }
    if cursor < seg_end {
        parts.push(Segment::Source(cursor, seg_end));
    }
    parts
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    !text[..start].chars().next_back().is_some_and(is_word_char)
        && !text[end..].chars().next().is_some_and(is_word_char)
}

/// Whether `token` occurs in `text` as a standalone word
pub fn contains_token(text: &str, token: &str) -> bool {
    !token.is_empty()
        && text
            .match_indices(token)
            .any(|(start, _)| is_word_bounded(text, start, start + token.len()))
}

/// Finds placeholder-shaped tokens and maps them back
#[derive(Debug, Clone)]
pub struct Restorer {
    opaque: Regex,
    semantic: Regex,
}

impl Restorer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| AnonymizerError::Pattern(format!("Invalid placeholder shape: {e}")))
        };

        Ok(Self {
            opaque: compile(r"<[A-Z][A-Z0-9_]*_[0-9a-f]{8}>")?,
            semantic: compile(r"\b[A-Z][A-Z0-9_]*[A-Z0-9]\b")?,
        })
    }

    /// Placeholder-shaped spans, sorted right to left
    pub fn candidate_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = self
            .opaque
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        let opaque_count = spans.len();

        for m in self.semantic.find_iter(text) {
            let nested = spans[..opaque_count]
                .iter()
                .any(|&(s, e)| s < m.end() && m.start() < e);
            if !nested {
                spans.push((m.start(), m.end()));
            }
        }

        spans.sort_by(|a, b| b.0.cmp(&a.0));
        spans
    }

    /// Replace every known placeholder with its original value
    pub fn restore(&self, text: &str, mapping: &PiiMapping) -> String {
        let mut restored = text.to_string();
        for (start, end) in self.candidate_spans(text) {
            if let Some(original) = mapping.original_for(&text[start..end]) {
                restored.replace_range(start..end, original);
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(v, p)| (v.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_every_occurrence() {
        let text = "Ann met Bob. Bob met Ann.";
        let out = substitute(text, &pairs(&[("Ann", "JANE_LEE"), ("Bob", "JOHN_MOORE")]));
        assert_eq!(out, "JANE_LEE met JOHN_MOORE. JOHN_MOORE met JANE_LEE.");
    }

    #[test]
    fn test_aliases_only_replace_whole_words() {
        let text = "Acme built Acmeville";
        let out = substitute(text, &pairs(&[("Acme", "NEXUS_GROUP")]));
        assert_eq!(out, "NEXUS_GROUP built Acmeville");

        let out = substitute(text, &pairs(&[("Acme", "<ORGANIZATION_0a0b0c0d>")]));
        assert_eq!(out, "<ORGANIZATION_0a0b0c0d> built <ORGANIZATION_0a0b0c0d>ville");
    }

    #[test]
    fn test_placeholders_not_rewritten() {
        let text = "On 12, call 555-1212";
        let out = substitute(
            text,
            &pairs(&[("555-1212", "<PHONE_1212abcd>"), ("12", "<DATE_0a0b0c0d>")]),
        );
        assert_eq!(out, "On <DATE_0a0b0c0d>, call <PHONE_1212abcd>");
    }

    #[test]
    fn test_substring_values_follow_position_order() {
        let text = "Acme Corp and Acme Corp Europe";
        let out = substitute(
            text,
            &pairs(&[("Acme Corp", "NEXUS_GROUP"), ("Acme Corp Europe", "ALPHA_INC")]),
        );
        assert_eq!(out, "NEXUS_GROUP and ALPHA_INC");

        let text = "Acme Corp Europe, not Acme Corp";
        let out = substitute(
            text,
            &pairs(&[("Acme Corp", "NEXUS_GROUP"), ("Acme Corp Europe", "ALPHA_INC")]),
        );
        assert_eq!(out, "ALPHA_INC, not NEXUS_GROUP");
    }

    #[test]
    fn test_restore_both_shapes() {
        let mut mapping = PiiMapping::new();
        mapping.insert("Acme Corporation", "NEXUS_GROUP").unwrap();
        mapping.insert("a@b.io", "<EMAIL_12345678>").unwrap();

        let restorer = Restorer::new().unwrap();
        let restored = restorer.restore(
            "NEXUS_GROUP wrote from <EMAIL_12345678> to UNKNOWN_TEAM",
            &mapping,
        );
        assert_eq!(restored, "Acme Corporation wrote from a@b.io to UNKNOWN_TEAM");
    }

    #[test]
    fn test_semantic_matches_inside_opaque_dropped() {
        let restorer = Restorer::new().unwrap();
        let spans = restorer.candidate_spans("x <EMAIL_12345678> LOCATION_2");
        assert_eq!(spans, vec![(19, 29), (2, 18)]);
    }

    #[test]
    fn test_contains_token_needs_word_boundaries() {
        assert!(contains_token("Site LOCATION_1 moved", "LOCATION_1"));
        assert!(contains_token("(LOCATION_1)", "LOCATION_1"));
        assert!(!contains_token("Site LOCATION_12 moved", "LOCATION_1"));
        assert!(!contains_token("XLOCATION_1", "LOCATION_1"));
        assert!(!contains_token("anything", ""));
    }

    #[test]
    fn test_restore_without_mapping_is_identity() {
        let restorer = Restorer::new().unwrap();
        let text = "NASA and <EMAIL_deadbeef> stay";
        assert_eq!(restorer.restore(text, &PiiMapping::new()), text);
    }
}
