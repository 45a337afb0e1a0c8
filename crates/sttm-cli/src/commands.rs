//! Subcommand implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use sttm_core::{ImpactAnalyzer, parse_mapping_diff, parse_test_cases};
use sttm_match::ScoringPreview;
use sttm_model::{AnalysisReport, MappingDocument, ScoringConfig, ScoringPreset, TestCaseDocument};

use crate::cli::{AnalyzeArgs, ConfigArgs, DiffArgs, ExplainArgs, PresetArg, ReportFormatArg, TestsArgs};
use crate::summary::{print_diff, print_report, print_test_cases};

/// Scenarios shown by `explain`, from a lone added field upwards.
const EXAMPLE_PREVIEWS: &[(&str, ScoringPreview)] = &[
    (
        "One added field, no references",
        ScoringPreview {
            deleted_fields: 0,
            modified_fields: 0,
            added_fields: 1,
            tab_match: false,
            field_references: 0,
            sample_references: 0,
        },
    ),
    (
        "One modified field, tab mentioned",
        ScoringPreview {
            deleted_fields: 0,
            modified_fields: 1,
            added_fields: 0,
            tab_match: true,
            field_references: 0,
            sample_references: 0,
        },
    ),
    (
        "One deleted field, tab and field mentioned",
        ScoringPreview {
            deleted_fields: 1,
            modified_fields: 0,
            added_fields: 0,
            tab_match: true,
            field_references: 1,
            sample_references: 0,
        },
    ),
    (
        "Two deleted fields, tab, fields and sample data mentioned",
        ScoringPreview {
            deleted_fields: 2,
            modified_fields: 0,
            added_fields: 0,
            tab_match: true,
            field_references: 2,
            sample_references: 1,
        },
    ),
];

/// Configuration file, else preset, else the balanced defaults.
pub fn resolve_config(config: Option<&Path>, preset: Option<PresetArg>) -> Result<ScoringConfig> {
    if let Some(path) = config {
        debug!(path = %path.display(), "loading scoring configuration");
        return ScoringConfig::load(path)
            .with_context(|| format!("load scoring configuration {}", path.display()));
    }
    let preset = preset.map_or(ScoringPreset::default(), ScoringPreset::from);
    debug!(preset = %preset, "using scoring preset");
    Ok(ScoringConfig::preset(preset))
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let config = resolve_config(args.config.as_deref(), args.preset)?;
    let analyzer = ImpactAnalyzer::new(config).context("invalid scoring configuration")?;
    let diff = parse_mapping_diff(&args.mapping_diff)
        .with_context(|| format!("parse mapping diff {}", args.mapping_diff.display()))?;
    let tests = parse_test_cases(&args.test_cases)
        .with_context(|| format!("parse test cases {}", args.test_cases.display()))?;

    let mut report = analyzer.analyze(&diff, &tests);
    report.metadata.mapping_diff_file = display_file_name(&args.mapping_diff);
    report.metadata.test_case_file = display_file_name(&args.test_cases);

    match args.format {
        ReportFormatArg::Json => {
            let value = report.to_value().context("serialize report")?;
            let text = serde_json::to_string_pretty(&value).context("serialize report")?;
            emit(&text, args.output.as_deref())?;
        }
        ReportFormatArg::Summary => match &args.output {
            Some(path) => emit(&report.executive_summary(), Some(path))?,
            None => print_report(&report),
        },
    }
    Ok(report)
}

pub fn run_diff(args: &DiffArgs) -> Result<MappingDocument> {
    let document = parse_mapping_diff(&args.mapping_diff)
        .with_context(|| format!("parse mapping diff {}", args.mapping_diff.display()))?;
    print_diff(&document);
    Ok(document)
}

pub fn run_tests(args: &TestsArgs) -> Result<TestCaseDocument> {
    let document = parse_test_cases(&args.test_cases)
        .with_context(|| format!("parse test cases {}", args.test_cases.display()))?;
    print_test_cases(&document);
    Ok(document)
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let preset = ScoringPreset::from(args.preset);
    let document = ScoringConfig::preset(preset).to_json_document(preset.description());
    let text = serde_json::to_string_pretty(&document).context("serialize configuration")?;
    emit(&text, args.output.as_deref())
}

pub fn run_explain(args: &ExplainArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), args.preset)?;
    config.validate().context("invalid scoring configuration")?;
    print!("{}", explain_text(&config));
    Ok(())
}

/// Configuration explanation followed by the example previews.
pub fn explain_text(config: &ScoringConfig) -> String {
    let mut text = config.explain();
    text.push('\n');
    for (title, preview) in EXAMPLE_PREVIEWS {
        text.push_str(&format!("\nExample: {title}\n"));
        text.push_str(&preview.render(config));
    }
    text
}

/// Write `text` to `output`, or stdout when `None`.
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
