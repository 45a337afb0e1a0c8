//! Scoring weights, thresholds and matching sensitivity.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::impact::ImpactLevel;

/// Keys accepted in configuration files but not used for scoring.
const IGNORED_KEYS: &[&str] = &["tab_name_match_points"];

/// Weights and thresholds used by the impact scorer and the text matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub deleted_field_points: u32,
    pub modified_field_points: u32,
    pub added_field_points: u32,
    pub exact_tab_match_points: u32,
    pub partial_tab_match_points: u32,
    pub field_name_match_points: u32,
    pub sample_data_match_points: u32,

    pub critical_threshold: u32,
    pub high_threshold: u32,
    pub medium_threshold: u32,
    pub low_threshold: u32,

    /// Matched keywords needed before a tab match counts as partial.
    pub partial_match_min_keywords: usize,
    /// Keyword coverage at or above which a tab match counts as exact.
    pub exact_tab_coverage: f64,
    #[serde(alias = "case_sensitive_matching")]
    pub case_sensitive: bool,
    pub minimum_keyword_length: usize,
    /// Suffixes accepted after a term when locating affected steps.
    /// Compared case-insensitively, so `s` also covers `S`.
    pub plural_suffixes: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            deleted_field_points: 5,
            modified_field_points: 3,
            added_field_points: 1,
            exact_tab_match_points: 2,
            partial_tab_match_points: 1,
            field_name_match_points: 2,
            sample_data_match_points: 3,
            critical_threshold: 12,
            high_threshold: 8,
            medium_threshold: 4,
            low_threshold: 0,
            partial_match_min_keywords: 1,
            exact_tab_coverage: 0.8,
            case_sensitive: false,
            minimum_keyword_length: 3,
            plural_suffixes: vec!["s".to_string()],
        }
    }
}

impl ScoringConfig {
    pub fn preset(preset: ScoringPreset) -> Self {
        let base = Self::default();
        match preset {
            ScoringPreset::Balanced => base,
            ScoringPreset::Conservative => Self {
                critical_threshold: 10,
                high_threshold: 6,
                medium_threshold: 3,
                deleted_field_points: 6,
                modified_field_points: 4,
                added_field_points: 2,
                ..base
            },
            ScoringPreset::Aggressive => Self {
                critical_threshold: 15,
                high_threshold: 10,
                medium_threshold: 6,
                ..base
            },
            ScoringPreset::Strict => Self {
                critical_threshold: 20,
                high_threshold: 12,
                medium_threshold: 8,
                case_sensitive: true,
                minimum_keyword_length: 4,
                ..base
            },
        }
    }

    /// Check the thresholds are ordered and the matching knobs are usable.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.critical_threshold <= self.high_threshold {
            problems.push(format!(
                "critical_threshold ({}) must be greater than high_threshold ({})",
                self.critical_threshold, self.high_threshold
            ));
        }
        if self.high_threshold <= self.medium_threshold {
            problems.push(format!(
                "high_threshold ({}) must be greater than medium_threshold ({})",
                self.high_threshold, self.medium_threshold
            ));
        }
        if self.medium_threshold < self.low_threshold {
            problems.push(format!(
                "medium_threshold ({}) must not be below low_threshold ({})",
                self.medium_threshold, self.low_threshold
            ));
        }
        if !(self.exact_tab_coverage > 0.0 && self.exact_tab_coverage <= 1.0) {
            problems.push(format!(
                "exact_tab_coverage ({}) must be in (0, 1]",
                self.exact_tab_coverage
            ));
        }
        if self.minimum_keyword_length == 0 {
            problems.push("minimum_keyword_length must be at least 1".to_string());
        }
        if self.partial_match_min_keywords == 0 {
            problems.push("partial_match_min_keywords must be at least 1".to_string());
        }
        if self.plural_suffixes.iter().any(|s| s.is_empty()) {
            problems.push("plural_suffixes must not contain empty strings".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }

    /// Map a point total to a level, checking thresholds from critical down.
    pub fn level_for(&self, points: u32) -> ImpactLevel {
        if points >= self.critical_threshold {
            ImpactLevel::Critical
        } else if points >= self.high_threshold {
            ImpactLevel::High
        } else if points >= self.medium_threshold {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    /// Load from a JSON document.
    ///
    /// Values may sit at the top level or under a `scoring` object. Keys
    /// starting with `_` are treated as comments. Missing keys take their
    /// default. `tab_name_match_points`, written by older tools alongside
    /// the exact and partial tab weights, carries no weight of its own and
    /// is dropped.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let mut section = match value {
            serde_json::Value::Object(mut root) => match root.remove("scoring") {
                Some(scoring @ serde_json::Value::Object(_)) => scoring,
                Some(other) => {
                    root.insert("scoring".to_string(), other);
                    serde_json::Value::Object(root)
                }
                None => serde_json::Value::Object(root),
            },
            other => other,
        };
        if let serde_json::Value::Object(map) = &mut section {
            map.retain(|key, _| {
                !key.starts_with('_') && !IGNORED_KEYS.contains(&key.as_str())
            });
        }
        serde_json::from_value(section)
    }

    /// Read a JSON configuration file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// JSON document in the layout accepted by [`ScoringConfig::load`].
    pub fn to_json_document(&self, description: &str) -> serde_json::Value {
        serde_json::json!({
            "_description": description,
            "scoring": self,
        })
    }

    /// Human-readable description of the weights and thresholds.
    pub fn explain(&self) -> String {
        let mut lines = vec![
            "Change composition:".to_string(),
            format!("  deleted field:   {} pts each", self.deleted_field_points),
            format!("  modified field:  {} pts each", self.modified_field_points),
            format!("  added field:     {} pts each", self.added_field_points),
            "Test references:".to_string(),
            format!(
                "  exact tab match:   {} pts (keyword coverage >= {:.0}%)",
                self.exact_tab_match_points,
                self.exact_tab_coverage * 100.0
            ),
            format!(
                "  partial tab match: {} pts (at least {} keyword(s))",
                self.partial_tab_match_points, self.partial_match_min_keywords
            ),
            format!(
                "  field name:        {} pts per reference",
                self.field_name_match_points
            ),
            format!(
                "  sample data:       {} pts per reference",
                self.sample_data_match_points
            ),
            "Impact levels:".to_string(),
            format!("  critical: >= {} pts", self.critical_threshold),
            format!(
                "  high:     {}-{} pts",
                self.high_threshold,
                self.critical_threshold.saturating_sub(1)
            ),
            format!(
                "  medium:   {}-{} pts",
                self.medium_threshold,
                self.high_threshold.saturating_sub(1)
            ),
            format!("  low:      < {} pts", self.medium_threshold),
            "Matching:".to_string(),
            format!(
                "  case sensitive: {}",
                if self.case_sensitive { "yes" } else { "no" }
            ),
            format!(
                "  minimum keyword length: {}",
                self.minimum_keyword_length
            ),
        ];
        if !self.plural_suffixes.is_empty() {
            lines.push(format!(
                "  plural suffixes: {}",
                self.plural_suffixes.join(", ")
            ));
        }
        lines.join("\n")
    }
}

/// Named starting points for [`ScoringConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScoringPreset {
    /// Lower thresholds and heavier change weights; flags more tests.
    Conservative,
    #[default]
    Balanced,
    /// Higher thresholds; flags fewer tests.
    Aggressive,
    /// Highest thresholds with case-sensitive matching.
    Strict,
}

impl ScoringPreset {
    pub const ALL: [ScoringPreset; 4] = [
        Self::Conservative,
        Self::Balanced,
        Self::Aggressive,
        Self::Strict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Strict => "strict",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Conservative => "Flags more tests for review; lower thresholds",
            Self::Balanced => "Default weights and thresholds",
            Self::Aggressive => "Flags only strongly referenced tests; higher thresholds",
            Self::Strict => "Case-sensitive matching with the highest thresholds",
        }
    }
}

impl fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: s.to_string(),
                expected: Self::ALL.map(|p| p.as_str()).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deleted_field_points, 5);
        assert_eq!(config.critical_threshold, 12);
    }

    #[test]
    fn every_preset_validates() {
        for preset in ScoringPreset::ALL {
            ScoringConfig::preset(preset)
                .validate()
                .unwrap_or_else(|e| panic!("{preset}: {e}"));
        }
        assert!(ScoringConfig::preset(ScoringPreset::Strict).case_sensitive);
    }

    #[test]
    fn level_thresholds_are_inclusive() {
        let config = ScoringConfig::default();
        assert_eq!(config.level_for(12), ImpactLevel::Critical);
        assert_eq!(config.level_for(11), ImpactLevel::High);
        assert_eq!(config.level_for(8), ImpactLevel::High);
        assert_eq!(config.level_for(4), ImpactLevel::Medium);
        assert_eq!(config.level_for(3), ImpactLevel::Low);
        assert_eq!(config.level_for(0), ImpactLevel::Low);
    }

    #[test]
    fn unordered_thresholds_rejected() {
        let config = ScoringConfig {
            critical_threshold: 8,
            high_threshold: 8,
            ..ScoringConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("critical_threshold (8)"));
    }

    #[test]
    fn coverage_outside_unit_interval_rejected() {
        let config = ScoringConfig {
            exact_tab_coverage: 1.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn json_accepts_wrapped_and_comment_keys() {
        let json = r#"{
            "_description": "team weights",
            "scoring": { "_note": "x", "deleted_field_points": 7, "high_threshold": 9 }
        }"#;
        let config = ScoringConfig::from_json_str(json).expect("parse");
        assert_eq!(config.deleted_field_points, 7);
        assert_eq!(config.high_threshold, 9);
        assert_eq!(config.critical_threshold, 12);
    }

    #[test]
    fn json_accepts_flat_layout() {
        let config =
            ScoringConfig::from_json_str(r#"{"case_sensitive": true}"#).expect("parse");
        assert!(config.case_sensitive);
    }

    #[test]
    fn json_accepts_saved_analyzer_config() {
        let json = r#"{
            "scoring": {
                "tab_name_match_points": 3,
                "deleted_field_points": 6,
                "modified_field_points": 3,
                "added_field_points": 1,
                "exact_tab_match_points": 2,
                "partial_tab_match_points": 1,
                "field_name_match_points": 2,
                "sample_data_match_points": 3,
                "critical_threshold": 12,
                "high_threshold": 8,
                "medium_threshold": 4,
                "low_threshold": 0,
                "case_sensitive_matching": true,
                "minimum_keyword_length": 4
            },
            "log_level": "INFO",
            "output_directory": "reports"
        }"#;
        let config = ScoringConfig::from_json_str(json).expect("parse");
        assert_eq!(config.deleted_field_points, 6);
        assert_eq!(config.exact_tab_match_points, 2);
        assert!(config.case_sensitive);
        assert_eq!(config.minimum_keyword_length, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_rejects_unknown_keys() {
        assert!(ScoringConfig::from_json_str(r#"{"deleted_points": 1}"#).is_err());
    }

    #[test]
    fn preset_parses_case_insensitively() {
        assert_eq!(
            "Aggressive".parse::<ScoringPreset>().expect("preset"),
            ScoringPreset::Aggressive
        );
        assert!("extreme".parse::<ScoringPreset>().is_err());
    }
}
