//! Error types for scoring configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`ScoringConfig`](crate::ScoringConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON or has unknown keys.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration values are inconsistent.
    #[error("invalid scoring configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },

    #[error("unknown preset '{name}' (expected one of: {expected})")]
    UnknownPreset { name: String, expected: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_problem() {
        let err = ConfigError::Invalid {
            problems: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "invalid scoring configuration: a; b");
    }
}
