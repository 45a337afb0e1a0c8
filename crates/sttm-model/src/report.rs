//! Assessment containers and the analysis report.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::impact::{ImpactLevel, ImpactScore, RecommendedAction};

/// One test case scored against one changed tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseImpactAssessment {
    pub test_case_id: String,
    pub test_case_name: String,
    pub unit_name: String,
    pub change_summary: String,
    pub impact_score: ImpactScore,
    /// Step numbers whose text names the change, ascending.
    pub affected_step_numbers: Vec<u32>,
}

impl TestCaseImpactAssessment {
    pub fn impact_level(&self) -> ImpactLevel {
        self.impact_score.impact_level
    }

    /// High or critical.
    pub fn is_high_impact(&self) -> bool {
        self.impact_level() >= ImpactLevel::High
    }

    pub fn requires_immediate_action(&self) -> bool {
        self.impact_score.recommended_action == RecommendedAction::UpdateImmediately
    }
}

/// Assessments for one changed tab, bucketed by impact level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitImpactSummary {
    pub unit_name: String,
    pub change_category: String,
    pub total_changes: usize,
    pub critical: Vec<TestCaseImpactAssessment>,
    pub high: Vec<TestCaseImpactAssessment>,
    pub medium: Vec<TestCaseImpactAssessment>,
    pub low: Vec<TestCaseImpactAssessment>,
}

impl UnitImpactSummary {
    pub fn new(
        unit_name: impl Into<String>,
        change_category: impl Into<String>,
        total_changes: usize,
    ) -> Self {
        Self {
            unit_name: unit_name.into(),
            change_category: change_category.into(),
            total_changes,
            ..Self::default()
        }
    }

    /// File an assessment under the bucket for its impact level.
    pub fn push(&mut self, assessment: TestCaseImpactAssessment) {
        let bucket = match assessment.impact_level() {
            ImpactLevel::Critical => &mut self.critical,
            ImpactLevel::High => &mut self.high,
            ImpactLevel::Medium => &mut self.medium,
            ImpactLevel::Low => &mut self.low,
        };
        bucket.push(assessment);
    }

    pub fn bucket(&self, level: ImpactLevel) -> &[TestCaseImpactAssessment] {
        match level {
            ImpactLevel::Critical => &self.critical,
            ImpactLevel::High => &self.high,
            ImpactLevel::Medium => &self.medium,
            ImpactLevel::Low => &self.low,
        }
    }

    pub fn count(&self, level: ImpactLevel) -> usize {
        self.bucket(level).len()
    }

    pub fn total_assessed(&self) -> usize {
        ImpactLevel::ALL.iter().map(|level| self.count(*level)).sum()
    }

    /// Critical then high.
    pub fn priority_tests(&self) -> impl Iterator<Item = &TestCaseImpactAssessment> {
        self.critical.iter().chain(self.high.iter())
    }

    /// All assessments, highest level first.
    pub fn assessments(&self) -> impl Iterator<Item = &TestCaseImpactAssessment> {
        self.critical
            .iter()
            .chain(self.high.iter())
            .chain(self.medium.iter())
            .chain(self.low.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// RFC 3339.
    pub timestamp: String,
    pub mapping_diff_file: String,
    pub test_case_file: String,
    pub mapping_diff_format: String,
    pub test_case_format: String,
    pub analyzer_version: String,
    pub scoring_config: ScoringConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_units_analyzed: usize,
    pub total_test_cases_analyzed: usize,
    pub total_changes: usize,
    pub total_critical_impact: usize,
    pub total_high_impact: usize,
    pub total_medium_impact: usize,
    pub total_low_impact: usize,
}

impl SummaryStatistics {
    pub fn count(&self, level: ImpactLevel) -> usize {
        match level {
            ImpactLevel::Critical => self.total_critical_impact,
            ImpactLevel::High => self.total_high_impact,
            ImpactLevel::Medium => self.total_medium_impact,
            ImpactLevel::Low => self.total_low_impact,
        }
    }

    pub fn total_assessed(&self) -> usize {
        ImpactLevel::ALL.iter().map(|level| self.count(*level)).sum()
    }

    pub fn priority_count(&self) -> usize {
        self.total_critical_impact + self.total_high_impact
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "analysis_metadata")]
    pub metadata: ReportMetadata,
    #[serde(rename = "summary_statistics")]
    pub summary: SummaryStatistics,
    pub units: Vec<UnitImpactSummary>,
    /// Parse warnings carried over from both input documents.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    /// Recompute the level totals from the unit buckets.
    pub fn refresh_summary(&mut self) {
        let total = |level| -> usize { self.units.iter().map(|u| u.count(level)).sum() };
        let critical = total(ImpactLevel::Critical);
        let high = total(ImpactLevel::High);
        let medium = total(ImpactLevel::Medium);
        let low = total(ImpactLevel::Low);
        self.summary.total_critical_impact = critical;
        self.summary.total_high_impact = high;
        self.summary.total_medium_impact = medium;
        self.summary.total_low_impact = low;
    }

    pub fn all_assessments(&self) -> impl Iterator<Item = &TestCaseImpactAssessment> {
        self.units.iter().flat_map(UnitImpactSummary::assessments)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitImpactSummary> {
        self.units.iter().find(|u| u.unit_name == name)
    }

    pub fn executive_summary(&self) -> String {
        let s = &self.summary;
        let mut text = String::from("EXECUTIVE SUMMARY\n=================\n");
        text.push_str(&format!(
            "Total Test Cases Analyzed: {}\n",
            s.total_test_cases_analyzed
        ));
        text.push_str(&format!("Total STTM Changes: {}\n", s.total_changes));
        text.push_str(&format!("Test Cases Affected: {}\n\n", s.total_assessed()));
        text.push_str("IMPACT BREAKDOWN:\n");
        if s.total_critical_impact > 0 {
            text.push_str(&format!(
                "Critical Impact: {} (requires immediate attention)\n",
                s.total_critical_impact
            ));
        }
        text.push_str(&format!(
            "High Impact: {} (update required)\n",
            s.total_high_impact
        ));
        text.push_str(&format!(
            "Medium Impact: {} (review recommended)\n",
            s.total_medium_impact
        ));
        text.push_str(&format!("Low Impact: {} (monitor)\n", s.total_low_impact));
        if s.priority_count() > 0 {
            text.push_str(&format!(
                "\nIMMEDIATE ACTION REQUIRED: {} test cases need updates\n",
                s.priority_count()
            ));
        }
        text
    }

    /// Plain nested value for transport, including the executive summary.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "executive_summary".to_string(),
                serde_json::Value::String(self.executive_summary()),
            );
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(id: &str, level: ImpactLevel, points: u32) -> TestCaseImpactAssessment {
        TestCaseImpactAssessment {
            test_case_id: id.to_string(),
            test_case_name: format!("Test {id}"),
            unit_name: "Vendor".to_string(),
            change_summary: "1 deleted".to_string(),
            impact_score: ImpactScore {
                total_points: points,
                impact_level: level,
                confidence: 0.0,
                scoring_reasons: Vec::new(),
                matches: Vec::new(),
                recommended_action: level.recommended_action(),
            },
            affected_step_numbers: Vec::new(),
        }
    }

    fn report(units: Vec<UnitImpactSummary>) -> AnalysisReport {
        AnalysisReport {
            metadata: ReportMetadata {
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                mapping_diff_file: "diff.json".to_string(),
                test_case_file: "tests.csv".to_string(),
                mapping_diff_format: "current".to_string(),
                test_case_format: "qtest".to_string(),
                analyzer_version: "test".to_string(),
                scoring_config: ScoringConfig::default(),
            },
            summary: SummaryStatistics {
                total_units_analyzed: units.len(),
                total_test_cases_analyzed: 3,
                total_changes: 4,
                ..SummaryStatistics::default()
            },
            units,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn push_routes_by_level() {
        let mut unit = UnitImpactSummary::new("Vendor", "mixed", 4);
        unit.push(assessment("TC-1", ImpactLevel::Critical, 14));
        unit.push(assessment("TC-2", ImpactLevel::Low, 1));
        unit.push(assessment("TC-3", ImpactLevel::Low, 0));
        assert_eq!(unit.count(ImpactLevel::Critical), 1);
        assert_eq!(unit.count(ImpactLevel::Low), 2);
        assert_eq!(unit.total_assessed(), 3);
        assert_eq!(unit.priority_tests().count(), 1);
        assert!(unit.critical[0].requires_immediate_action());
    }

    #[test]
    fn refresh_summary_counts_buckets() {
        let mut first = UnitImpactSummary::new("Vendor", "mixed", 4);
        first.push(assessment("TC-1", ImpactLevel::High, 9));
        let mut second = UnitImpactSummary::new("Dealer", "deletions_only", 1);
        second.push(assessment("TC-1", ImpactLevel::High, 8));
        second.push(assessment("TC-2", ImpactLevel::Medium, 5));
        let mut report = report(vec![first, second]);
        report.refresh_summary();
        assert_eq!(report.summary.total_high_impact, 2);
        assert_eq!(report.summary.total_medium_impact, 1);
        assert_eq!(report.summary.total_assessed(), 3);
        assert_eq!(report.all_assessments().count(), 3);
    }

    #[test]
    fn executive_summary_mentions_priority_work() {
        let mut unit = UnitImpactSummary::new("Vendor", "mixed", 4);
        unit.push(assessment("TC-1", ImpactLevel::Critical, 12));
        let mut report = report(vec![unit]);
        report.refresh_summary();
        let text = report.executive_summary();
        assert!(text.starts_with("EXECUTIVE SUMMARY\n"));
        assert!(text.contains("Critical Impact: 1 (requires immediate attention)"));
        assert!(text.contains("IMMEDIATE ACTION REQUIRED: 1 test cases need updates"));
    }

    #[test]
    fn to_value_has_transport_sections() {
        let report = report(Vec::new());
        let value = report.to_value().expect("serialize");
        assert!(value.get("analysis_metadata").is_some());
        assert!(value.get("summary_statistics").is_some());
        assert!(value["executive_summary"].as_str().is_some());
        assert_eq!(
            value["analysis_metadata"]["scoring_config"]["high_threshold"],
            8
        );
        assert_eq!(
            serde_json::to_value(RecommendedAction::Monitor).expect("action"),
            "monitor"
        );
    }
}
