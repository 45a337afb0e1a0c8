//! Impact analysis of source-to-target mapping changes on test cases.
//!
//! The entry points parse a mapping diff and a test case export, then score
//! every test case against every changed unit of the diff:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = sttm_core::analyze_impact(
//!     Path::new("diff.json"),
//!     Path::new("test_cases.csv"),
//!     None,
//! )?;
//! println!("{}", report.executive_summary());
//! # Ok::<(), sttm_core::AnalysisError>(())
//! ```

pub mod analyzer;
pub mod error;
pub mod steps;

use std::path::Path;

use sttm_ingest::{MappingDiffParser, TestCaseParser};
use sttm_model::{AnalysisReport, MappingDocument, ScoringConfig, TestCaseDocument};
use tracing::info;

pub use analyzer::{ANALYZER_VERSION, ImpactAnalyzer};
pub use error::{AnalysisError, Result};
pub use steps::AffectedStepFinder;

/// Parse a mapping diff with the built-in adapters.
pub fn parse_mapping_diff(path: &Path) -> Result<MappingDocument> {
    Ok(MappingDiffParser::new().parse_file(path)?)
}

/// Parse a test case export with the built-in adapters.
pub fn parse_test_cases(path: &Path) -> Result<TestCaseDocument> {
    Ok(TestCaseParser::new().parse_file(path)?)
}

/// Parse both inputs and analyze them. The configuration, default when
/// `None`, is validated before anything is read.
pub fn analyze_impact(
    mapping_diff: &Path,
    test_cases: &Path,
    config: Option<ScoringConfig>,
) -> Result<AnalysisReport> {
    let analyzer = ImpactAnalyzer::new(config.unwrap_or_default())?;
    info!(
        mapping_diff = %mapping_diff.display(),
        test_cases = %test_cases.display(),
        "starting impact analysis"
    );
    let diff = parse_mapping_diff(mapping_diff)?;
    let tests = parse_test_cases(test_cases)?;

    let mut report = analyzer.analyze(&diff, &tests);
    report.metadata.mapping_diff_file = file_name(mapping_diff);
    report.metadata.test_case_file = file_name(test_cases);
    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
