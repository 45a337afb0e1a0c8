//! Ingestion of mapping diffs and test case exports.
//!
//! Both inputs go through an ordered registry of format adapters. The
//! first adapter whose validation accepts the input extracts it; when none
//! does, the registry's default adapter is tried and a warning is recorded
//! on the resulting document.

pub mod diff;
pub mod error;
pub mod id_pattern;
pub mod testcase;
pub mod workbook;

pub use diff::{
    AdapterRegistry, CurrentFormatAdapter, DiffConverter, LegacyFormatAdapter, MappingDiffAdapter,
    MappingDiffParser, RawMapping, RawTab, WorksheetChangesAdapter, parse_mapping_diff_file,
};
pub use error::{IngestError, Result};
pub use id_pattern::IdPatternDetector;
pub use testcase::{
    QTestAdapter, RawTestCase, TestCaseAdapter, TestCaseAdapterRegistry, TestCaseExtraction,
    TestCaseParser, parse_test_case_file,
};
pub use workbook::{Sheet, Workbook, load_workbook};
