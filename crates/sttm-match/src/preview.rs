//! Hypothetical scores for explaining a configuration.

use sttm_model::{ImpactLevel, RecommendedAction, ScoringConfig};

use crate::scorer::weighted;

/// Evidence counts to score without a real test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringPreview {
    pub deleted_fields: usize,
    pub modified_fields: usize,
    pub added_fields: usize,
    /// Counted as an exact tab match.
    pub tab_match: bool,
    pub field_references: usize,
    pub sample_references: usize,
}

/// Outcome of a [`ScoringPreview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub total_points: u32,
    pub impact_level: ImpactLevel,
    pub recommended_action: RecommendedAction,
    pub breakdown: Vec<String>,
}

impl ScoringPreview {
    pub fn evaluate(&self, config: &ScoringConfig) -> PreviewOutcome {
        let mut total_points = 0u32;
        let mut breakdown = Vec::new();
        if self.tab_match {
            total_points = total_points.saturating_add(config.exact_tab_match_points);
            breakdown.push(format!("Tab name match: +{}", config.exact_tab_match_points));
        }
        for (count, each, label) in [
            (self.deleted_fields, config.deleted_field_points, "deleted fields"),
            (self.modified_fields, config.modified_field_points, "modified fields"),
            (self.added_fields, config.added_field_points, "added fields"),
            (self.field_references, config.field_name_match_points, "field name references"),
            (self.sample_references, config.sample_data_match_points, "sample data references"),
        ] {
            if count > 0 {
                let points = weighted(count, each);
                total_points = total_points.saturating_add(points);
                breakdown.push(format!("{count} {label}: +{points}"));
            }
        }
        let impact_level = config.level_for(total_points);
        PreviewOutcome {
            total_points,
            impact_level,
            recommended_action: impact_level.recommended_action(),
            breakdown,
        }
    }

    /// Multi-line preview report.
    pub fn render(&self, config: &ScoringConfig) -> String {
        let outcome = self.evaluate(config);
        let mut lines = vec![
            "SCORING PREVIEW".to_string(),
            "=".repeat(15),
            format!("Total Points: {}", outcome.total_points),
            format!("Impact Level: {}", outcome.impact_level),
            format!(
                "Recommended Action: {}",
                outcome.recommended_action.as_str().replace('_', " ")
            ),
            String::new(),
            "Point Breakdown:".to_string(),
        ];
        lines.extend(outcome.breakdown.iter().map(|item| format!("  • {item}")));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
