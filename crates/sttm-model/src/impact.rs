//! Match evidence and impact score types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of evidence found in a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactTab,
    PartialTab,
    FieldName,
    SampleData,
    NoMatch,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactTab => "exact_tab",
            Self::PartialTab => "partial_tab",
            Self::FieldName => "field_name",
            Self::SampleData => "sample_data",
            Self::NoMatch => "no_match",
        }
    }

    /// Ranking used when picking the best tab match; higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::ExactTab => 3,
            Self::PartialTab => 2,
            Self::FieldName | Self::SampleData => 1,
            Self::NoMatch => 0,
        }
    }

    pub fn is_tab_match(&self) -> bool {
        matches!(self, Self::ExactTab | Self::PartialTab)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a test case a piece of text was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "snake_case")]
pub enum TextLocation {
    Name,
    Description,
    Precondition,
    StepDescription(u32),
    StepExpectedResult(u32),
}

impl TextLocation {
    pub fn step_number(&self) -> Option<u32> {
        match self {
            Self::StepDescription(n) | Self::StepExpectedResult(n) => Some(*n),
            Self::Name | Self::Description | Self::Precondition => None,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("test_name"),
            Self::Description => f.write_str("description"),
            Self::Precondition => f.write_str("precondition"),
            Self::StepDescription(n) => write!(f, "step_{n}_description"),
            Self::StepExpectedResult(n) => write!(f, "step_{n}_expected_result"),
        }
    }
}

/// One piece of evidence that a test case references a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_type: MatchType,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub matched_text: String,
    pub location: TextLocation,
    pub reasoning: String,
}

/// Scoring question a reason was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    TabNameReference,
    DeletedFields,
    ModifiedFields,
    AddedFields,
    FieldNameReference,
    SampleDataReference,
}

impl ScoringRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabNameReference => "tab_name_reference",
            Self::DeletedFields => "deleted_fields",
            Self::ModifiedFields => "modified_fields",
            Self::AddedFields => "added_fields",
            Self::FieldNameReference => "field_name_reference",
            Self::SampleDataReference => "sample_data_reference",
        }
    }
}

impl fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded by a single rule, with the evidence behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringReason {
    pub points_added: u32,
    pub reason: String,
    pub evidence: String,
    pub rule: ScoringRule,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    /// Highest first.
    pub const ALL: [ImpactLevel; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn recommended_action(&self) -> RecommendedAction {
        match self {
            Self::Critical => RecommendedAction::UpdateImmediately,
            Self::High => RecommendedAction::UpdateRequired,
            Self::Medium => RecommendedAction::ReviewRecommended,
            Self::Low => RecommendedAction::Monitor,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    UpdateImmediately,
    UpdateRequired,
    ReviewRecommended,
    Monitor,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateImmediately => "update_immediately",
            Self::UpdateRequired => "update_required",
            Self::ReviewRecommended => "review_recommended",
            Self::Monitor => "monitor",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::UpdateImmediately => "Update immediately",
            Self::UpdateRequired => "Update required",
            Self::ReviewRecommended => "Review recommended",
            Self::Monitor => "Monitor",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score of one test case against one changed tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactScore {
    pub total_points: u32,
    pub impact_level: ImpactLevel,
    /// Aggregate confidence of the matches, in `[0, 1]`.
    pub confidence: f64,
    pub scoring_reasons: Vec<ScoringReason>,
    pub matches: Vec<MatchResult>,
    pub recommended_action: RecommendedAction,
}

impl ImpactScore {
    pub fn points_from_reasons(&self) -> u32 {
        self.scoring_reasons.iter().map(|r| r.points_added).sum()
    }

    pub fn points_for(&self, rule: ScoringRule) -> u32 {
        self.scoring_reasons
            .iter()
            .filter(|r| r.rule == rule)
            .map(|r| r.points_added)
            .sum()
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// `"9 pts (HIGH): 5 deleted_fields, 2 tab_name_reference, ..."`
    pub fn breakdown(&self) -> String {
        let parts: Vec<String> = self
            .scoring_reasons
            .iter()
            .map(|r| format!("{} {}", r.points_added, r.rule))
            .collect();
        if parts.is_empty() {
            format!("{} pts ({})", self.total_points, self.impact_level.label())
        } else {
            format!(
                "{} pts ({}): {}",
                self.total_points,
                self.impact_level.label(),
                parts.join(", ")
            )
        }
    }
}
