//! Finding change references in test cases and turning them into scores.
//!
//! [`TextMatcher`] produces raw [`MatchResult`](sttm_model::MatchResult)s,
//! [`MatchAggregator`] ranks and summarises them, and [`ImpactScorer`]
//! converts matches plus change counts into an
//! [`ImpactScore`](sttm_model::ImpactScore).

pub mod aggregate;
pub mod keywords;
pub mod matcher;
pub mod preview;
pub mod scorer;

pub use aggregate::MatchAggregator;
pub use keywords::extract_keywords;
pub use matcher::{TextMatcher, text_locations};
pub use preview::{PreviewOutcome, ScoringPreview};
pub use scorer::ImpactScorer;
