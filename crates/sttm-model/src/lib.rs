//! Domain models shared by the STTM impact analysis crates.

pub mod config;
pub mod error;
pub mod impact;
pub mod mapping;
pub mod report;
pub mod test_case;

pub use config::{ScoringConfig, ScoringPreset};
pub use error::{ConfigError, Result};
pub use impact::{
    ImpactLevel, ImpactScore, MatchResult, MatchType, RecommendedAction, ScoringReason,
    ScoringRule, TextLocation,
};
pub use mapping::{ChangeType, FieldChange, Mapping, MappingDocument, Tab, TabChangeCategory};
pub use report::{
    AnalysisReport, ReportMetadata, SummaryStatistics, TestCaseImpactAssessment,
    UnitImpactSummary,
};
pub use test_case::{IdPattern, SYSTEM_TERMS, TestCase, TestCaseDocument, TestStep};
