use proptest::prelude::*;
use sttm_model::{
    AnalysisReport, ImpactLevel, ImpactScore, ReportMetadata, ScoringConfig, SummaryStatistics,
    TestCaseImpactAssessment, UnitImpactSummary,
};

fn assessment(index: usize, points: u32, config: &ScoringConfig) -> TestCaseImpactAssessment {
    let level = config.level_for(points);
    TestCaseImpactAssessment {
        test_case_id: format!("TC-{index:04}"),
        test_case_name: format!("Case {index}"),
        unit_name: "Unit".to_string(),
        change_summary: "1 deleted".to_string(),
        impact_score: ImpactScore {
            total_points: points,
            impact_level: level,
            confidence: 0.5,
            scoring_reasons: Vec::new(),
            matches: Vec::new(),
            recommended_action: level.recommended_action(),
        },
        affected_step_numbers: Vec::new(),
    }
}

fn empty_report(units: Vec<UnitImpactSummary>) -> AnalysisReport {
    AnalysisReport {
        metadata: ReportMetadata {
            timestamp: String::new(),
            mapping_diff_file: String::new(),
            test_case_file: String::new(),
            mapping_diff_format: String::new(),
            test_case_format: String::new(),
            analyzer_version: String::new(),
            scoring_config: ScoringConfig::default(),
        },
        summary: SummaryStatistics::default(),
        units,
        warnings: Vec::new(),
    }
}

proptest! {
    #[test]
    fn every_assessment_lands_in_one_bucket(
        units in prop::collection::vec(prop::collection::vec(0u32..30, 0..12), 0..5)
    ) {
        let config = ScoringConfig::default();
        let mut summaries = Vec::new();
        let mut expected_total = 0;
        for (u, points) in units.iter().enumerate() {
            let mut summary = UnitImpactSummary::new(format!("Unit {u}"), "mixed", points.len());
            for (i, p) in points.iter().enumerate() {
                summary.push(assessment(i, *p, &config));
            }
            prop_assert_eq!(summary.total_assessed(), points.len());
            for level in ImpactLevel::ALL {
                for a in summary.bucket(level) {
                    prop_assert_eq!(a.impact_level(), level);
                }
            }
            expected_total += points.len();
            summaries.push(summary);
        }

        let mut report = empty_report(summaries);
        report.refresh_summary();
        prop_assert_eq!(report.summary.total_assessed(), expected_total);
        for level in ImpactLevel::ALL {
            let from_units: usize = report.units.iter().map(|u| u.count(level)).sum();
            prop_assert_eq!(report.summary.count(level), from_units);
        }
    }
}

#[test]
fn config_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scoring.json");
    let config = ScoringConfig {
        deleted_field_points: 9,
        ..ScoringConfig::default()
    };
    let document = config.to_json_document("custom weights");
    std::fs::write(&path, serde_json::to_string_pretty(&document).expect("json"))
        .expect("write");

    let loaded = ScoringConfig::load(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn invalid_config_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scoring.json");
    std::fs::write(&path, r#"{"scoring": {"high_threshold": 20}}"#).expect("write");

    let err = ScoringConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("high_threshold (20)"));
}
