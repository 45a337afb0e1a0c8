//! Test case ingestion from tabular exports.

pub mod adapter;
pub mod columns;
pub mod converter;
pub mod qtest;
pub mod sheet;

use std::path::Path;

use sttm_model::TestCaseDocument;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::id_pattern::IdPatternDetector;
use crate::workbook::{Workbook, load_workbook};

pub use adapter::{RawTestCase, TestCaseAdapter, TestCaseAdapterRegistry, TestCaseExtraction};
pub use columns::{ColumnMap, ColumnRole, detect_header_row, map_columns};
pub use converter::TestCaseConverter;
pub use qtest::QTestAdapter;
pub use sheet::select_test_sheet;

/// Parses test case exports into a [`TestCaseDocument`].
#[derive(Debug, Default)]
pub struct TestCaseParser {
    registry: TestCaseAdapterRegistry,
    converter: TestCaseConverter,
    detector: IdPatternDetector,
}

impl TestCaseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: TestCaseAdapterRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Add an adapter ahead of the built-ins.
    pub fn register_adapter(&mut self, adapter: Box<dyn TestCaseAdapter>) {
        info!(format = adapter.format_name(), "registered test case adapter");
        self.registry.register(adapter);
    }

    pub fn supported_formats(&self) -> Vec<&str> {
        self.registry.format_names()
    }

    pub fn parse_file(&self, path: &Path) -> Result<TestCaseDocument> {
        let workbook = load_workbook(path)?;
        debug!(path = %path.display(), sheets = workbook.sheets.len(), "parsing test cases");
        self.parse_workbook(&workbook)
    }

    pub fn parse_workbook(&self, workbook: &Workbook) -> Result<TestCaseDocument> {
        let (adapter, fallback) = self.registry.select(workbook);
        let mut warnings = Vec::new();
        if fallback {
            let message = format!(
                "no adapter recognised the test case export, using '{}'",
                adapter.format_name()
            );
            warn!("{message}");
            warnings.push(message);
        }

        let extraction = adapter.extract_test_cases(workbook)?;
        let test_cases = self.converter.convert(extraction.test_cases);
        if test_cases.is_empty() {
            let message = format!("no test cases found in sheet '{}'", extraction.selected_sheet);
            warn!("{message}");
            warnings.push(message);
        }

        let ids: Vec<&str> = test_cases.iter().map(|case| case.id.as_str()).collect();
        let id_pattern = self.detector.analyze(&ids);

        let document = TestCaseDocument {
            test_cases,
            sheet_names: workbook.sheet_names(),
            selected_sheet: extraction.selected_sheet,
            format_name: adapter.format_name().to_string(),
            id_pattern,
            warnings,
        };
        info!(
            format = %document.format_name,
            sheet = %document.selected_sheet,
            rows = extraction.rows_processed,
            test_cases = document.total_test_cases(),
            steps = document.total_steps(),
            id_pattern = %document.id_pattern.description,
            "parsed test cases"
        );
        Ok(document)
    }
}

/// Parse a test case export with the built-in adapters.
pub fn parse_test_case_file(path: &Path) -> Result<TestCaseDocument> {
    TestCaseParser::new().parse_file(path)
}
