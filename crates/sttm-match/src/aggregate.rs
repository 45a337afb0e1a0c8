//! Summaries over a list of match results.

use sttm_model::{MatchResult, MatchType};

/// Confidence added per distinct match type beyond the first.
pub const TYPE_DIVERSITY_BOOST: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAggregator;

impl MatchAggregator {
    /// Highest priority match, ties broken by confidence, then by order.
    pub fn best_tab_match<'a>(&self, matches: &'a [MatchResult]) -> Option<&'a MatchResult> {
        matches.iter().reduce(|best, candidate| {
            let rank = |m: &MatchResult| (m.match_type.priority(), m.confidence);
            if rank(candidate) > rank(best) {
                candidate
            } else {
                best
            }
        })
    }

    /// Highest confidence plus a boost per additional distinct match type,
    /// capped at 1. Zero for no matches.
    pub fn overall_confidence(&self, matches: &[MatchResult]) -> f64 {
        let Some(max) = matches.iter().map(|m| m.confidence).reduce(f64::max) else {
            return 0.0;
        };
        let types = distinct_types(matches).len();
        (max + TYPE_DIVERSITY_BOOST * (types - 1) as f64).min(1.0)
    }

    /// Counts per match type in first-seen order, e.g. `"2 Exact Tab, 1 Field Name"`.
    pub fn match_summary(&self, matches: &[MatchResult]) -> String {
        if matches.is_empty() {
            return "No matches found".to_string();
        }
        distinct_types(matches)
            .into_iter()
            .map(|kind| {
                let count = matches.iter().filter(|m| m.match_type == kind).count();
                format!("{count} {}", title_case(kind.as_str()))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn distinct_types(matches: &[MatchResult]) -> Vec<MatchType> {
    let mut types = Vec::new();
    for m in matches {
        if !types.contains(&m.match_type) {
            types.push(m.match_type);
        }
    }
    types
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sttm_model::TextLocation;

    fn hit(match_type: MatchType, confidence: f64, text: &str) -> MatchResult {
        MatchResult {
            match_type,
            confidence,
            matched_text: text.to_string(),
            location: TextLocation::Name,
            reasoning: String::new(),
        }
    }

    #[test]
    fn best_match_prefers_priority_then_confidence() {
        let matches = vec![
            hit(MatchType::FieldName, 0.9, "VendorId"),
            hit(MatchType::PartialTab, 0.8, "Vendor"),
            hit(MatchType::PartialTab, 0.8, "Inbound"),
        ];
        let best = MatchAggregator.best_tab_match(&matches).unwrap();
        assert_eq!(best.matched_text, "Vendor");
        assert!(MatchAggregator.best_tab_match(&[]).is_none());
    }

    #[test]
    fn confidence_boosts_for_type_diversity() {
        let aggregator = MatchAggregator;
        assert_eq!(aggregator.overall_confidence(&[]), 0.0);
        let one = [hit(MatchType::ExactTab, 0.8, "Vendor")];
        assert!((aggregator.overall_confidence(&one) - 0.8).abs() < 1e-9);
        let two = [
            hit(MatchType::ExactTab, 0.8, "Vendor"),
            hit(MatchType::FieldName, 0.9, "VendorId"),
        ];
        assert!((aggregator.overall_confidence(&two) - 1.0).abs() < 1e-9);
        let three = [
            hit(MatchType::ExactTab, 0.8, "Vendor"),
            hit(MatchType::FieldName, 0.9, "VendorId"),
            hit(MatchType::SampleData, 0.9, "V-1"),
        ];
        assert_eq!(aggregator.overall_confidence(&three), 1.0);
    }

    #[test]
    fn summary_counts_by_type() {
        let matches = [
            hit(MatchType::ExactTab, 0.8, "Vendor"),
            hit(MatchType::FieldName, 0.9, "VendorId"),
            hit(MatchType::ExactTab, 0.8, "Inbound"),
        ];
        assert_eq!(
            MatchAggregator.match_summary(&matches),
            "2 Exact Tab, 1 Field Name"
        );
        assert_eq!(MatchAggregator.match_summary(&[]), "No matches found");
    }
}
