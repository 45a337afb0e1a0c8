//! Cross every changed unit with every test case.

use chrono::Utc;
use sttm_match::ImpactScorer;
use sttm_model::{
    AnalysisReport, MappingDocument, ReportMetadata, ScoringConfig, SummaryStatistics, Tab,
    TestCaseDocument, TestCaseImpactAssessment, UnitImpactSummary,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::steps::AffectedStepFinder;

/// Version recorded in report metadata.
pub const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scores every (changed unit, test case) pair and assembles the report.
#[derive(Debug, Clone)]
pub struct ImpactAnalyzer {
    scorer: ImpactScorer,
}

impl ImpactAnalyzer {
    /// Fails when `config` is inconsistent.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: ImpactScorer::new(config),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Full cross product; no pair is skipped. Level totals are recomputed
    /// from the unit buckets once everything is filed.
    pub fn analyze(&self, diff: &MappingDocument, tests: &TestCaseDocument) -> AnalysisReport {
        let units: Vec<UnitImpactSummary> = diff
            .changed_units()
            .map(|tab| self.analyze_unit(tab, tests))
            .collect();

        let mut warnings = diff.warnings.clone();
        warnings.extend(tests.warnings.iter().cloned());

        let mut report = AnalysisReport {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                mapping_diff_file: String::new(),
                test_case_file: String::new(),
                mapping_diff_format: diff.format_name.clone(),
                test_case_format: tests.format_name.clone(),
                analyzer_version: ANALYZER_VERSION.to_string(),
                scoring_config: self.config().clone(),
            },
            summary: SummaryStatistics {
                total_units_analyzed: units.len(),
                total_test_cases_analyzed: tests.total_test_cases(),
                total_changes: units.iter().map(|u| u.total_changes).sum(),
                ..SummaryStatistics::default()
            },
            units,
            warnings,
        };
        report.refresh_summary();
        info!(
            units = report.summary.total_units_analyzed,
            test_cases = report.summary.total_test_cases_analyzed,
            critical = report.summary.total_critical_impact,
            high = report.summary.total_high_impact,
            medium = report.summary.total_medium_impact,
            low = report.summary.total_low_impact,
            "impact analysis complete"
        );
        report
    }

    /// Assess every test case against one changed tab.
    pub fn analyze_unit(&self, tab: &Tab, tests: &TestCaseDocument) -> UnitImpactSummary {
        let unit_name = tab.display_name();
        let change_summary = tab.change_summary();
        let finder = AffectedStepFinder::for_tab(tab, &self.config().plural_suffixes);
        let mut summary =
            UnitImpactSummary::new(&unit_name, tab.change_category.as_str(), tab.total_changes());

        for test_case in &tests.test_cases {
            let impact_score = self.scorer.score(test_case, tab);
            summary.push(TestCaseImpactAssessment {
                test_case_id: test_case.id.clone(),
                test_case_name: test_case.name.clone(),
                unit_name: unit_name.clone(),
                change_summary: change_summary.clone(),
                impact_score,
                affected_step_numbers: finder.find(test_case),
            });
        }
        debug!(
            unit = %unit_name,
            changes = summary.total_changes,
            assessed = summary.total_assessed(),
            priority = summary.priority_tests().count(),
            "analyzed unit"
        );
        summary
    }
}
