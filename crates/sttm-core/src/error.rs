//! Error types at the analysis boundary.

use std::path::PathBuf;

use sttm_ingest::IngestError;
use sttm_model::ConfigError;
use thiserror::Error;

/// Errors surfaced by the parse and analysis entry points.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input path does not exist.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input could not be read or decoded.
    #[error("format error: {0}")]
    Format(#[source] IngestError),

    /// Input decoded but its structure is unusable.
    #[error("validation error: {0}")]
    Validation(#[source] IngestError),

    /// Scoring configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl From<IngestError> for AnalysisError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::FileNotFound { path } => Self::NotFound { path },
            err if err.is_validation() => Self::Validation(err),
            err => Self::Format(err),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
