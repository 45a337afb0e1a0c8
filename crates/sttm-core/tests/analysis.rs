//! End-to-end analysis from files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use sttm_core::{AnalysisError, analyze_impact, parse_mapping_diff, parse_test_cases};
use sttm_model::{ImpactLevel, RecommendedAction, ScoringConfig};

const TEST_CASES: &str = "\
Id,Name,Description,Test Step #,Test Step Description,Test Step Expected Result
TC-0001,Vendor Inbound regression,Sync vendors,1,Open Vendor Inbound screen,Screen shown
,,,2,Check VendorId on the record,Record saved
TC-0002,Dealer lookup,,1,Search dealer,Dealer found
";

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let diff = json!({
        "report_metadata": {"generated_at": "2024-05-01T10:00:00"},
        "detailed_changes": {
            "changed_tabs": [{
                "tab_name": "Vendor Inbound",
                "change_type": "deletions_only",
                "mappings": {
                    "deleted_mappings": [
                        {"mapping_fields": {"Source Field": "VendorId", "Target Field": ""}}
                    ]
                }
            }],
            "unchanged_tabs": []
        }
    });
    let diff_path = dir.join("diff.json");
    fs::write(&diff_path, diff.to_string()).unwrap();
    let tests_path = dir.join("qtest.csv");
    fs::write(&tests_path, TEST_CASES).unwrap();
    (diff_path, tests_path)
}

#[test]
fn analyzes_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (diff_path, tests_path) = write_inputs(dir.path());

    let report = analyze_impact(&diff_path, &tests_path, None).unwrap();
    assert_eq!(report.metadata.mapping_diff_file, "diff.json");
    assert_eq!(report.metadata.test_case_file, "qtest.csv");
    assert_eq!(report.summary.total_units_analyzed, 1);
    assert_eq!(report.summary.total_test_cases_analyzed, 2);

    let unit = report.unit("Vendor Inbound").unwrap();
    // 2 exact tab + 5 deleted + 2 field reference
    let vendor = &unit.high[0];
    assert_eq!(vendor.test_case_id, "TC-0001");
    assert_eq!(vendor.impact_score.total_points, 9);
    assert_eq!(vendor.impact_score.recommended_action, RecommendedAction::UpdateRequired);
    assert_eq!(vendor.affected_step_numbers, vec![1, 2]);

    let dealer = &unit.medium[0];
    assert_eq!(dealer.test_case_id, "TC-0002");
    assert_eq!(dealer.impact_level(), ImpactLevel::Medium);

    let value = report.to_value().unwrap();
    assert_eq!(value["summary_statistics"]["total_high_impact"], 1);
    assert_eq!(value["summary_statistics"]["total_medium_impact"], 1);
    assert!(value["executive_summary"]
        .as_str()
        .unwrap()
        .contains("IMMEDIATE ACTION REQUIRED: 1 test cases need updates"));
    assert_eq!(
        value["units"][0]["high"][0]["impact_score"]["scoring_reasons"][0]["rule"],
        "tab_name_reference"
    );
}

#[test]
fn invalid_configuration_is_reported_before_parsing() {
    let config = ScoringConfig {
        critical_threshold: 5,
        ..ScoringConfig::default()
    };
    let err = analyze_impact(Path::new("missing.json"), Path::new("missing.csv"), Some(config))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Configuration(_)));
}

#[test]
fn errors_map_to_the_boundary_taxonomy() {
    let dir = tempfile::tempdir().unwrap();

    let err = parse_mapping_diff(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, AnalysisError::NotFound { .. }));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "not json").unwrap();
    assert!(matches!(
        parse_mapping_diff(&broken).unwrap_err(),
        AnalysisError::Format(_)
    ));

    let unknown = dir.path().join("unknown.json");
    fs::write(&unknown, r#"{"something": "else"}"#).unwrap();
    assert!(matches!(
        parse_mapping_diff(&unknown).unwrap_err(),
        AnalysisError::Validation(_)
    ));

    let no_ids = dir.path().join("tests.csv");
    fs::write(&no_ids, "Summary,Owner\nx,y\n").unwrap();
    assert!(matches!(
        parse_test_cases(&no_ids).unwrap_err(),
        AnalysisError::Validation(_)
    ));
}
