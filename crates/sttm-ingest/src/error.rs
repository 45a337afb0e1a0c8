//! Error types for document ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a mapping diff or a test case export.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input path does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input path exists but is not a regular file.
    #[error("not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Encoding Errors ===
    /// Mapping diff is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Test case export is not readable CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Spreadsheet could not be opened or a sheet could not be read.
    #[error("failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    // === Structural Errors ===
    /// No adapter recognised the diff and the fallback found no tabs.
    #[error("unrecognised mapping diff structure: no adapter matched and '{fallback}' found no tabs")]
    NoTabsExtracted { fallback: String },

    /// Workbook has no sheets to read test cases from.
    #[error("no sheets found in {path}")]
    EmptyWorkbook { path: PathBuf },

    /// Workbook has no sheet to take test cases from.
    #[error("no test case sheet available")]
    NoTestSheet,

    /// Required test case columns could not be mapped.
    #[error(
        "missing required columns {} in sheet '{sheet}' (found: {})",
        missing.join(", "),
        available.join(", ")
    )]
    MissingColumns {
        sheet: String,
        missing: Vec<String>,
        available: Vec<String>,
    },
}

impl IngestError {
    /// Input exists but its structure is unusable.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotAFile { .. }
                | Self::NoTabsExtracted { .. }
                | Self::EmptyWorkbook { .. }
                | Self::NoTestSheet
                | Self::MissingColumns { .. }
        )
    }

    /// Input could not be decoded at all.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson { .. } | Self::CsvParse { .. } | Self::Spreadsheet { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
