//! Pluggable test case export adapters.

use sttm_model::TestStep;

use super::qtest::QTestAdapter;
use crate::error::Result;
use crate::workbook::Workbook;

/// A test case as an adapter read it, before content analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTestCase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub precondition: String,
    /// Sorted by step number.
    pub steps: Vec<TestStep>,
}

/// What an adapter pulled out of a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseExtraction {
    pub selected_sheet: String,
    pub test_cases: Vec<RawTestCase>,
    pub rows_processed: usize,
}

/// Reads test cases from one export layout.
pub trait TestCaseAdapter: Send + Sync {
    fn format_name(&self) -> &str;

    /// Whether this adapter understands `workbook`.
    fn validate_format(&self, workbook: &Workbook) -> bool;

    /// Fails when required columns cannot be found; malformed rows are skipped.
    fn extract_test_cases(&self, workbook: &Workbook) -> Result<TestCaseExtraction>;
}

/// Ordered adapters with a fixed fallback, mirroring the diff registry.
pub struct TestCaseAdapterRegistry {
    adapters: Vec<Box<dyn TestCaseAdapter>>,
    fallback: Box<dyn TestCaseAdapter>,
}

impl TestCaseAdapterRegistry {
    pub fn empty(fallback: Box<dyn TestCaseAdapter>) -> Self {
        Self {
            adapters: Vec::new(),
            fallback,
        }
    }

    /// Insert ahead of every adapter already registered.
    pub fn register(&mut self, adapter: Box<dyn TestCaseAdapter>) {
        self.adapters.insert(0, adapter);
    }

    /// First validating adapter, or the fallback with `true`.
    pub fn select(&self, workbook: &Workbook) -> (&dyn TestCaseAdapter, bool) {
        match self.adapters.iter().find(|a| a.validate_format(workbook)) {
            Some(adapter) => (adapter.as_ref(), false),
            None => (self.fallback.as_ref(), true),
        }
    }

    pub fn format_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.format_name()).collect()
    }
}

impl Default for TestCaseAdapterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(Box::new(QTestAdapter));
        registry.register(Box::new(QTestAdapter));
        registry
    }
}

impl std::fmt::Debug for TestCaseAdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCaseAdapterRegistry")
            .field("adapters", &self.format_names())
            .field("fallback", &self.fallback.format_name())
            .finish()
    }
}
