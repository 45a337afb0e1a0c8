//! Detect the shape of test case identifiers.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use sttm_model::IdPattern;
use tracing::{debug, info};

/// Known identifier shapes, in preference order for equal coverage.
const KNOWN_SHAPES: &[(&str, &str)] = &[
    (r"^TC-?\d+$", "TC-#### format"),
    (r"^TEST-?\d+$", "TEST-#### format"),
    (r"^T-?\d+$", "T-#### format"),
    (r"^[A-Z]+-\d+$", "PREFIX-#### format"),
    (r"^\d+$", "Numeric only format"),
    (r"^[A-Z]{2,4}\d+$", "ALPHA#### format"),
    (r"^.+-\w+$", "Complex format"),
];

/// Coverage below which a custom shape is attempted.
const CUSTOM_SHAPE_BELOW: f64 = 0.5;
const CUSTOM_SAMPLE_SIZE: usize = 10;
const SAMPLE_ID_COUNT: usize = 5;

/// Leading letters, separator run, digits.
static COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)([^A-Za-z\d]*)(\d*)").expect("Invalid identifier components regex")
});

static SHAPES: LazyLock<Vec<(Regex, &'static str, &'static str)>> = LazyLock::new(|| {
    KNOWN_SHAPES
        .iter()
        .map(|(pattern, description)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("Invalid identifier shape regex");
            (regex, *pattern, *description)
        })
        .collect()
});

struct Candidate {
    pattern: String,
    description: String,
    confidence: f64,
}

/// Picks the identifier shape covering the most ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdPatternDetector;

impl IdPatternDetector {
    pub fn analyze<S: AsRef<str>>(&self, ids: &[S]) -> IdPattern {
        let ids: Vec<&str> = ids
            .iter()
            .map(|id| id.as_ref().trim())
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("nan"))
            .collect();
        if ids.is_empty() {
            return IdPattern::unknown("No test IDs found");
        }

        let mut best: Option<Candidate> = None;
        for (regex, pattern, description) in SHAPES.iter() {
            let matched = ids.iter().filter(|id| regex.is_match(id)).count();
            if matched == 0 {
                continue;
            }
            let confidence = matched as f64 / ids.len() as f64;
            debug!(shape = *description, matched, total = ids.len(), "identifier shape coverage");
            if best.as_ref().is_none_or(|b| confidence > b.confidence) {
                best = Some(Candidate {
                    pattern: (*pattern).to_string(),
                    description: (*description).to_string(),
                    confidence,
                });
            }
        }

        if best.as_ref().is_none_or(|b| b.confidence < CUSTOM_SHAPE_BELOW)
            && let Some(custom) = self.custom_shape(&ids)
            && best.as_ref().is_none_or(|b| custom.confidence > b.confidence)
        {
            best = Some(custom);
        }

        let Some(best) = best else {
            return IdPattern {
                sample_ids: sample(&ids),
                ..IdPattern::unknown("Unknown format")
            };
        };

        let (prefix, separator, number_part) = self.decompose(&ids);
        info!(
            shape = %best.description,
            confidence = best.confidence,
            "detected identifier pattern"
        );
        IdPattern {
            pattern: best.pattern,
            description: best.description,
            confidence: best.confidence,
            sample_ids: sample(&ids),
            prefix,
            separator,
            number_part,
        }
    }

    /// Whether `id` has the detected shape.
    pub fn matches(&self, pattern: &IdPattern, id: &str) -> bool {
        if pattern.pattern.is_empty() {
            return false;
        }
        compile(&pattern.pattern).is_some_and(|regex| regex.is_match(id.trim()))
    }

    /// Build a shape from the most common prefix and separator of a sample.
    fn custom_shape(&self, ids: &[&str]) -> Option<Candidate> {
        let mut prefixes = Vec::new();
        let mut separators = Vec::new();
        for id in ids.iter().take(CUSTOM_SAMPLE_SIZE) {
            if let Some(caps) = COMPONENTS.captures(id) {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let sep = caps.get(2).map_or("", |m| m.as_str());
                if !prefix.is_empty() {
                    prefixes.push(prefix);
                }
                if !sep.is_empty() {
                    separators.push(sep);
                }
            }
        }
        let prefix = most_common(&prefixes)?;
        let (pattern, description) = match most_common(&separators) {
            Some(sep) => (
                format!(r"^{}{}\d+$", regex::escape(prefix), regex::escape(sep)),
                format!("{prefix}{sep}#### format"),
            ),
            None => (
                format!(r"^{}\d*.*$", regex::escape(prefix)),
                format!("{prefix}#### format (custom)"),
            ),
        };
        let regex = compile(&pattern)?;
        let matched = ids.iter().filter(|id| regex.is_match(id)).count();
        Some(Candidate {
            pattern,
            description,
            confidence: matched as f64 / ids.len() as f64,
        })
    }

    /// Split the first decomposable identifier into prefix, separator, number.
    fn decompose(&self, ids: &[&str]) -> (Option<String>, Option<String>, Option<String>) {
        for id in ids.iter().take(SAMPLE_ID_COUNT) {
            if let Some(caps) = COMPONENTS.captures(id) {
                let part = |i: usize| {
                    caps.get(i)
                        .map(|m| m.as_str())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                return (part(1), part(2), part(3));
            }
        }
        let number = ids
            .first()
            .filter(|id| id.chars().all(|c| c.is_ascii_digit()))
            .map(|id| (*id).to_string());
        (None, None, number)
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

fn sample(ids: &[&str]) -> Vec<String> {
    ids.iter()
        .take(SAMPLE_ID_COUNT)
        .map(|id| (*id).to_string())
        .collect()
}

/// Most frequent item; ties go to the first seen.
fn most_common<'a>(items: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(*item).or_insert(0) += 1;
    }
    let mut best: Option<(&'a str, usize)> = None;
    for item in items {
        let count = counts[item];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((*item, count));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tc_shape_full_confidence() {
        let detector = IdPatternDetector;
        let pattern = detector.analyze(&["TC-0001", "TC-0002", "TC-0003"]);
        assert_eq!(pattern.description, "TC-#### format");
        assert_eq!(pattern.confidence, 1.0);
        assert_eq!(pattern.prefix.as_deref(), Some("TC"));
        assert_eq!(pattern.separator.as_deref(), Some("-"));
        assert_eq!(pattern.number_part.as_deref(), Some("0001"));
        assert!(pattern.is_reliable());
        assert_eq!(pattern.generate_new_id("NEW"), "TC-9999-NEW");
        assert!(detector.matches(&pattern, "tc-42"));
        assert!(!detector.matches(&pattern, "TX-42"));
    }

    #[test]
    fn numeric_ids() {
        let pattern = IdPatternDetector.analyze(&["101", "102", "103", "104"]);
        assert_eq!(pattern.description, "Numeric only format");
        assert_eq!(pattern.prefix, None);
        assert_eq!(pattern.number_part.as_deref(), Some("101"));
    }

    #[test]
    fn ties_keep_library_order() {
        // Both the TC and PREFIX shapes cover every id.
        let pattern = IdPatternDetector.analyze(&["TC-1", "TC-2"]);
        assert_eq!(pattern.pattern, r"^TC-?\d+$");
    }

    #[test]
    fn custom_shape_for_unusual_ids() {
        let ids = ["QA_1", "QA_2", "QA_3", "misc"];
        let pattern = IdPatternDetector.analyze(&ids);
        assert_eq!(pattern.description, "QA_#### format");
        assert_eq!(pattern.confidence, 0.75);
        assert_eq!(pattern.generate_new_id("X"), "QA_9999_X");
    }

    #[test]
    fn empty_and_blank_ids() {
        let detector = IdPatternDetector;
        let empty: [&str; 0] = [];
        assert_eq!(detector.analyze(&empty).description, "No test IDs found");
        let blank = detector.analyze(&["  ", "nan"]);
        assert_eq!(blank.confidence, 0.0);
        assert!(!blank.is_reliable());
    }

    #[test]
    fn most_common_prefers_first_seen_on_tie() {
        assert_eq!(most_common(&["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_common(&[]), None);
    }
}
