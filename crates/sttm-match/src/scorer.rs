//! Point accumulation over the four scoring questions.

use sttm_model::{
    ImpactScore, Mapping, MatchResult, MatchType, ScoringConfig, ScoringReason, ScoringRule, Tab,
    TestCase,
};
use tracing::debug;

use crate::aggregate::MatchAggregator;
use crate::matcher::TextMatcher;

/// `count` items at `points` each, saturating.
pub(crate) fn weighted(count: usize, points: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(points)
}

/// Scores one test case against one changed tab.
///
/// Scoring is pure: the same test case, tab and configuration always give
/// the same score, and every point is carried by exactly one reason.
#[derive(Debug, Clone)]
pub struct ImpactScorer {
    config: ScoringConfig,
    matcher: TextMatcher,
    aggregator: MatchAggregator,
}

impl ImpactScorer {
    /// The configuration is used as given; validate it first.
    pub fn new(config: ScoringConfig) -> Self {
        let matcher = TextMatcher::from_config(&config);
        Self {
            config,
            matcher,
            aggregator: MatchAggregator,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn matcher(&self) -> &TextMatcher {
        &self.matcher
    }

    pub fn score(&self, test_case: &TestCase, tab: &Tab) -> ImpactScore {
        let mut reasons = Vec::new();
        let mut matches = Vec::new();

        // Does the test mention the changed tab?
        let tab_matches = self.matcher.find_tab_references(test_case, &tab.name);
        if let Some(best) = self.aggregator.best_tab_match(&tab_matches) {
            let points = self.tab_points(best.match_type);
            if points > 0 {
                reasons.push(ScoringReason {
                    points_added: points,
                    reason: format!("Test mentions the changed tab '{}'", tab.name),
                    evidence: best.matched_text.clone(),
                    rule: ScoringRule::TabNameReference,
                });
            }
        }
        matches.extend(tab_matches);

        // What kind of changes happened?
        reasons.extend(self.change_reasons(tab));

        // Does the test mention changed field names or sample values?
        let changed: Vec<&Mapping> = tab.changed_mappings().collect();
        let field_matches = self
            .matcher
            .find_field_references(test_case, changed.iter().copied());
        let points = weighted(field_matches.len(), self.config.field_name_match_points);
        if points > 0 {
            reasons.push(ScoringReason {
                points_added: points,
                reason: format!(
                    "Test references changed field names: {}",
                    joined_texts(&field_matches)
                ),
                evidence: format!("Found {} field name references", field_matches.len()),
                rule: ScoringRule::FieldNameReference,
            });
        }
        matches.extend(field_matches);

        let sample_matches = self
            .matcher
            .find_sample_data_references(test_case, changed.iter().copied());
        let points = weighted(sample_matches.len(), self.config.sample_data_match_points);
        if points > 0 {
            reasons.push(ScoringReason {
                points_added: points,
                reason: format!(
                    "Test references changed sample data: {}",
                    joined_texts(&sample_matches)
                ),
                evidence: format!("Found {} sample data references", sample_matches.len()),
                rule: ScoringRule::SampleDataReference,
            });
        }
        matches.extend(sample_matches);

        let total_points = reasons
            .iter()
            .fold(0u32, |sum, r| sum.saturating_add(r.points_added));
        let impact_level = self.config.level_for(total_points);
        let score = ImpactScore {
            total_points,
            impact_level,
            confidence: self.aggregator.overall_confidence(&matches),
            scoring_reasons: reasons,
            matches,
            recommended_action: impact_level.recommended_action(),
        };
        debug!(
            test_case = %test_case.id,
            tab = %tab.name,
            points = score.total_points,
            level = %score.impact_level,
            "scored test case"
        );
        score
    }

    fn tab_points(&self, match_type: MatchType) -> u32 {
        match match_type {
            MatchType::ExactTab => self.config.exact_tab_match_points,
            MatchType::PartialTab => self.config.partial_tab_match_points,
            MatchType::FieldName | MatchType::SampleData | MatchType::NoMatch => 0,
        }
    }

    /// One reason per non-empty change bucket, deleted first.
    fn change_reasons(&self, tab: &Tab) -> Vec<ScoringReason> {
        [
            (
                &tab.deleted,
                self.config.deleted_field_points,
                "deleted",
                "Deleted",
                ScoringRule::DeletedFields,
            ),
            (
                &tab.modified,
                self.config.modified_field_points,
                "modified",
                "Modified",
                ScoringRule::ModifiedFields,
            ),
            (
                &tab.added,
                self.config.added_field_points,
                "added",
                "Added",
                ScoringRule::AddedFields,
            ),
        ]
        .into_iter()
        .filter_map(|(bucket, each, verb, label, rule)| {
            let points = weighted(bucket.len(), each);
            (points > 0).then(|| {
                let fields: Vec<&str> = bucket.iter().map(|m| m.source_field.as_str()).collect();
                ScoringReason {
                    points_added: points,
                    reason: format!("{} field(s) were {verb}", bucket.len()),
                    evidence: format!("{label} fields: {fields:?}"),
                    rule,
                }
            })
        })
        .collect()
    }
}

fn joined_texts(matches: &[MatchResult]) -> String {
    matches
        .iter()
        .map(|m| m.matched_text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sttm_model::{ChangeType, ImpactLevel, RecommendedAction, TabChangeCategory, TestStep};

    fn vendor_tab() -> Tab {
        let mut tab = Tab::new("Vendor Inbound", TabChangeCategory::Mixed);
        tab.deleted = vec![Mapping::new("VendorId", "VENDOR_ID", ChangeType::Deleted)];
        tab.added = vec![Mapping::new("TaxCode", "TAX_CODE", ChangeType::Added)];
        tab
    }

    #[test]
    fn unrelated_test_scores_only_change_composition() {
        let case = TestCase::new("TC-9", "Dealer lookup");
        let score = ImpactScorer::new(ScoringConfig::default()).score(&case, &vendor_tab());
        assert_eq!(score.total_points, 6);
        assert_eq!(score.impact_level, ImpactLevel::Medium);
        assert_eq!(score.recommended_action, RecommendedAction::ReviewRecommended);
        assert_eq!(score.confidence, 0.0);
        assert!(score.matches.is_empty());
        let reasons: Vec<&str> = score.scoring_reasons.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(reasons, vec!["1 field(s) were deleted", "1 field(s) were added"]);
        assert_eq!(score.scoring_reasons[0].evidence, r#"Deleted fields: ["VendorId"]"#);
    }

    #[test]
    fn referencing_test_collects_all_evidence() {
        let mut case = TestCase::new("TC-1", "Vendor Inbound sync");
        case.steps = vec![TestStep::new(1, "Check VendorId", "")];
        let score = ImpactScorer::new(ScoringConfig::default()).score(&case, &vendor_tab());
        // 2 exact tab + 5 deleted + 1 added + 2 field name
        assert_eq!(score.total_points, 10);
        assert_eq!(score.impact_level, ImpactLevel::High);
        assert_eq!(score.points_from_reasons(), score.total_points);
        assert_eq!(score.points_for(ScoringRule::TabNameReference), 2);
        assert_eq!(score.scoring_reasons[0].evidence, "Vendor");
        let field = score
            .scoring_reasons
            .iter()
            .find(|r| r.rule == ScoringRule::FieldNameReference)
            .unwrap();
        assert_eq!(field.reason, "Test references changed field names: VendorId");
        assert_eq!(field.evidence, "Found 1 field name references");
        assert!((score.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weights_add_no_reasons() {
        let config = ScoringConfig {
            added_field_points: 0,
            ..ScoringConfig::default()
        };
        let case = TestCase::new("TC-9", "Dealer lookup");
        let score = ImpactScorer::new(config).score(&case, &vendor_tab());
        assert_eq!(score.scoring_reasons.len(), 1);
        assert_eq!(score.total_points, 5);
    }

    #[test]
    fn weighted_saturates() {
        assert_eq!(weighted(3, 5), 15);
        assert_eq!(weighted(usize::MAX, 2), u32::MAX);
    }
}
