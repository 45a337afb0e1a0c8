//! Search test case text for references to a changed tab.

use sttm_model::{Mapping, MatchResult, MatchType, ScoringConfig, TestCase, TextLocation};
use tracing::trace;

use crate::keywords::extract_keywords;

/// Confidence of a single tab keyword hit.
pub const KEYWORD_CONFIDENCE: f64 = 0.8;

/// Confidence of a verbatim field name or sample value hit.
pub const EXACT_TEXT_CONFIDENCE: f64 = 0.9;

/// Sample values shorter than this are too generic to search for.
pub const MIN_SAMPLE_LENGTH: usize = 2;

/// Every searchable piece of text in a test case, skipping blanks.
pub fn text_locations(test_case: &TestCase) -> Vec<(TextLocation, &str)> {
    let mut locations = vec![
        (TextLocation::Name, test_case.name.as_str()),
        (TextLocation::Description, test_case.description.as_str()),
        (TextLocation::Precondition, test_case.precondition.as_str()),
    ];
    for step in &test_case.steps {
        locations.push((
            TextLocation::StepDescription(step.step_number),
            step.description.as_str(),
        ));
        locations.push((
            TextLocation::StepExpectedResult(step.step_number),
            step.expected_result.as_str(),
        ));
    }
    locations.retain(|(_, text)| !text.trim().is_empty());
    locations
}

/// Keyword and exact-text search over a test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatcher {
    case_sensitive: bool,
    min_keyword_length: usize,
    exact_coverage: f64,
    partial_min_keywords: usize,
}

impl Default for TextMatcher {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl TextMatcher {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
            min_keyword_length: config.minimum_keyword_length,
            exact_coverage: config.exact_tab_coverage,
            partial_min_keywords: config.partial_match_min_keywords,
        }
    }

    /// Keyword hits for `tab_name`, one per (keyword, location).
    ///
    /// Every hit carries the classification of the whole search, so the
    /// list is either all exact-tab or all partial-tab. When the hits do not
    /// add up to a partial match the list is empty.
    pub fn find_tab_references(&self, test_case: &TestCase, tab_name: &str) -> Vec<MatchResult> {
        let keywords = extract_keywords(tab_name, self.min_keyword_length);
        if keywords.is_empty() {
            return Vec::new();
        }

        let mut matched = vec![false; keywords.len()];
        let mut hits = Vec::new();
        for (location, text) in text_locations(test_case) {
            for (index, keyword) in keywords.iter().enumerate() {
                if let Some(found) = self.find_in(text, keyword) {
                    matched[index] = true;
                    hits.push(MatchResult {
                        match_type: MatchType::PartialTab,
                        confidence: KEYWORD_CONFIDENCE,
                        matched_text: found.to_string(),
                        location,
                        reasoning: format!("Found keyword '{keyword}' in {location}"),
                    });
                }
            }
        }

        let matched_count = matched.iter().filter(|m| **m).count();
        let match_type = self.classify(matched_count, keywords.len());
        trace!(
            test_case = %test_case.id,
            tab = tab_name,
            keywords = keywords.len(),
            matched = matched_count,
            match_type = %match_type,
            "tab keyword search"
        );
        if match_type == MatchType::NoMatch {
            return Vec::new();
        }
        for hit in &mut hits {
            hit.match_type = match_type;
        }
        hits
    }

    /// Verbatim hits for each distinct changed source or target field name.
    pub fn find_field_references<'a>(
        &self,
        test_case: &TestCase,
        mappings: impl IntoIterator<Item = &'a Mapping>,
    ) -> Vec<MatchResult> {
        let mut names: Vec<&str> = Vec::new();
        for mapping in mappings {
            for name in mapping.field_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        self.find_exact(test_case, &names, MatchType::FieldName)
    }

    /// Verbatim hits for each distinct source sample value.
    pub fn find_sample_data_references<'a>(
        &self,
        test_case: &TestCase,
        mappings: impl IntoIterator<Item = &'a Mapping>,
    ) -> Vec<MatchResult> {
        let mut values: Vec<&str> = Vec::new();
        for mapping in mappings {
            let Some(sample) = mapping.source_sample_data.as_deref().map(str::trim) else {
                continue;
            };
            if sample.chars().count() >= MIN_SAMPLE_LENGTH && !values.contains(&sample) {
                values.push(sample);
            }
        }
        self.find_exact(test_case, &values, MatchType::SampleData)
    }

    /// Classify keyword coverage alone: at or above the exact threshold is
    /// an exact tab match, anything above zero is partial.
    pub fn classify_coverage(&self, coverage: f64) -> MatchType {
        if coverage >= self.exact_coverage {
            MatchType::ExactTab
        } else if coverage > 0.0 {
            MatchType::PartialTab
        } else {
            MatchType::NoMatch
        }
    }

    /// Classify `matched` of `total` distinct keywords.
    pub fn classify(&self, matched: usize, total: usize) -> MatchType {
        if total == 0 || matched == 0 {
            return MatchType::NoMatch;
        }
        match self.classify_coverage(matched as f64 / total as f64) {
            MatchType::PartialTab if matched < self.partial_min_keywords => MatchType::NoMatch,
            other => other,
        }
    }

    fn find_exact(&self, test_case: &TestCase, needles: &[&str], kind: MatchType) -> Vec<MatchResult> {
        let label = match kind {
            MatchType::SampleData => "sample data",
            _ => "field name",
        };
        let locations = text_locations(test_case);
        let mut hits = Vec::new();
        for needle in needles {
            for (location, text) in &locations {
                if self.find_in(text, needle).is_some() {
                    hits.push(MatchResult {
                        match_type: kind,
                        confidence: EXACT_TEXT_CONFIDENCE,
                        matched_text: (*needle).to_string(),
                        location: *location,
                        reasoning: format!("Found {label} '{needle}' in {location}"),
                    });
                }
            }
        }
        hits
    }

    /// The slice of `haystack` matching `needle`, honouring case sensitivity.
    fn find_in<'h>(&self, haystack: &'h str, needle: &str) -> Option<&'h str> {
        if needle.is_empty() {
            return None;
        }
        if self.case_sensitive {
            return haystack
                .find(needle)
                .map(|start| &haystack[start..start + needle.len()]);
        }
        find_ignore_case(haystack, needle)
    }
}

/// Case-insensitive substring search returning the original spelling.
fn find_ignore_case<'h>(haystack: &'h str, needle: &str) -> Option<&'h str> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    'start: for (start, _) in haystack.char_indices() {
        let mut remaining = needle.as_slice();
        for (offset, c) in haystack[start..].char_indices() {
            for lower in c.to_lowercase() {
                match remaining.split_first() {
                    Some((wanted, rest)) if *wanted == lower => remaining = rest,
                    _ => continue 'start,
                }
            }
            if remaining.is_empty() {
                return Some(&haystack[start..start + offset + c.len_utf8()]);
            }
        }
        // Ran out of haystack; later starts are shorter still.
        return None;
    }
    None
}
