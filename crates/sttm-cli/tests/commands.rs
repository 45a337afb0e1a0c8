//! Subcommands driven through the library, with fixtures on disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use sttm_cli::cli::{
    AnalyzeArgs, Cli, Command, ConfigArgs, DiffArgs, ExplainArgs, PresetArg, ReportFormatArg,
    TestsArgs,
};
use sttm_cli::commands::{
    explain_text, resolve_config, run_analyze, run_config, run_diff, run_explain, run_tests,
};
use sttm_cli::summary::{diff_table, priority_table, test_case_table, unit_table};
use sttm_model::{ScoringConfig, ScoringPreset};

const DIFF: &str = r#"{
  "report_metadata": {"generated_at": "2024-05-01T10:00:00"},
  "detailed_changes": {
    "changed_tabs": [{
      "tab_name": "Vendor Inbound",
      "change_type": "mixed",
      "mappings": {
        "deleted_mappings": [{"mapping_fields": {"Source Field": "VendorId", "Target Field": ""}}],
        "added_mappings": [{"mapping_fields": {"Source Field": "TaxCode", "Target Field": ""}}]
      }
    }],
    "unchanged_tabs": [{"tab_name": "Dealer", "change_type": "unchanged"}]
  }
}"#;

const TESTS: &str = "\
Id,Name,Test Step #,Test Step Description,Test Step Expected Result
TC-0001,Vendor Inbound regression,1,Check VendorId,Value present
TC-0002,Dealer lookup,1,Search dealer,Dealer found
";

fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let diff = dir.join("diff.json");
    fs::write(&diff, DIFF).unwrap();
    let tests = dir.join("tests.csv");
    fs::write(&tests, TESTS).unwrap();
    (diff, tests)
}

#[test]
fn parses_analyze_command_line() {
    let cli = Cli::try_parse_from([
        "sttm-impact",
        "analyze",
        "diff.json",
        "tests.csv",
        "--preset",
        "strict",
        "--format",
        "json",
    ])
    .unwrap();
    let Command::Analyze(args) = cli.command else {
        panic!("expected analyze");
    };
    assert_eq!(args.mapping_diff, PathBuf::from("diff.json"));
    assert!(matches!(args.preset, Some(PresetArg::Strict)));
    assert!(matches!(args.format, ReportFormatArg::Json));
}

#[test]
fn config_file_takes_precedence_over_preset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scoring.json");
    fs::write(&path, r#"{"scoring": {"deleted_field_points": 9}}"#).unwrap();

    let config = resolve_config(Some(&path), Some(PresetArg::Strict)).unwrap();
    assert_eq!(config.deleted_field_points, 9);
    assert!(!config.case_sensitive);

    let preset = resolve_config(None, Some(PresetArg::Aggressive)).unwrap();
    assert_eq!(preset, ScoringConfig::preset(ScoringPreset::Aggressive));
    assert_eq!(resolve_config(None, None).unwrap(), ScoringConfig::default());
}

#[test]
fn analyze_writes_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let (diff, tests) = fixtures(dir.path());
    let output = dir.path().join("report.json");
    let args = AnalyzeArgs {
        mapping_diff: diff,
        test_cases: tests,
        config: None,
        preset: None,
        format: ReportFormatArg::Json,
        output: Some(output.clone()),
    };
    let report = run_analyze(&args).unwrap();
    assert_eq!(report.metadata.mapping_diff_file, "diff.json");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["analysis_metadata"]["test_case_file"], "tests.csv");
    assert_eq!(value["summary_statistics"]["total_units_analyzed"], 1);
    // 2 exact tab + 5 deleted + 1 added + 2 field reference
    assert_eq!(value["units"][0]["high"][0]["test_case_id"], "TC-0001");
    assert_eq!(value["units"][0]["high"][0]["impact_score"]["total_points"], 10);
    assert_eq!(value["units"][0]["medium"][0]["test_case_id"], "TC-0002");

    let units = unit_table(&report).to_string();
    assert!(units.contains("Vendor Inbound"));
    assert!(units.contains("TOTAL"));
    let priority = priority_table(&report).to_string();
    assert!(priority.contains("TC-0001"));
    assert!(!priority.contains("TC-0002"));
}

#[test]
fn analyze_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let (diff, tests) = fixtures(dir.path());
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"high_threshold": 50}"#).unwrap();
    let args = AnalyzeArgs {
        mapping_diff: diff,
        test_cases: tests,
        config: Some(config),
        preset: None,
        format: ReportFormatArg::Summary,
        output: None,
    };
    let err = run_analyze(&args).unwrap_err();
    assert!(format!("{err:#}").contains("high_threshold (50)"));
}

#[test]
fn diff_and_tests_commands_summarise_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let (diff, tests) = fixtures(dir.path());

    let document = run_diff(&DiffArgs { mapping_diff: diff }).unwrap();
    assert_eq!(document.total_changes(), 2);
    let table = diff_table(&document).to_string();
    assert!(table.contains("Vendor Inbound"));
    assert!(table.contains("Dealer"));

    let document = run_tests(&TestsArgs { test_cases: tests }).unwrap();
    assert_eq!(document.total_test_cases(), 2);
    let table = test_case_table(&document).to_string();
    assert!(table.contains("TC-9999-NEW"));
}

#[test]
fn config_command_round_trips_presets() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("conservative.json");
    run_config(&ConfigArgs {
        preset: PresetArg::Conservative,
        output: Some(output.clone()),
    })
    .unwrap();
    let loaded = ScoringConfig::load(&output).unwrap();
    assert_eq!(loaded, ScoringConfig::preset(ScoringPreset::Conservative));
}

#[test]
fn explain_includes_previews() {
    let text = explain_text(&ScoringConfig::default());
    assert!(text.contains("Change composition:"));
    assert!(text.contains("Example: One deleted field, tab and field mentioned"));
    assert!(text.contains("Total Points: 9\nImpact Level: high"));
    run_explain(&ExplainArgs {
        config: None,
        preset: Some(PresetArg::Balanced),
    })
    .unwrap();
}
