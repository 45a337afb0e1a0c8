//! Test case types produced from tabular test management exports.

use serde::{Deserialize, Serialize};

/// Vocabulary scanned for [`TestCase::referenced_systems`].
pub const SYSTEM_TERMS: &[&str] = &[
    "vendor", "proxy", "netsuite", "d365", "dynamics", "inbound", "outbound", "mapping", "field",
    "target", "source", "dealer", "consumer", "request", "response",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub step_number: u32,
    pub description: String,
    pub expected_result: String,
}

impl TestStep {
    pub fn new(
        step_number: u32,
        description: impl Into<String>,
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            step_number,
            description: description.into(),
            expected_result: expected_result.into(),
        }
    }

    /// Description and expected result joined by a space.
    pub fn text(&self) -> String {
        format!("{} {}", self.description, self.expected_result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub description: String,
    pub precondition: String,
    pub steps: Vec<TestStep>,
    /// Hits against [`SYSTEM_TERMS`], in vocabulary order.
    #[serde(default)]
    pub referenced_systems: Vec<String>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, step_number: u32) -> Option<&TestStep> {
        self.steps.iter().find(|s| s.step_number == step_number)
    }

    /// All non-empty text of the test case joined by spaces.
    pub fn all_text(&self) -> String {
        let mut parts = vec![
            self.name.as_str(),
            self.description.as_str(),
            self.precondition.as_str(),
        ];
        for step in &self.steps {
            parts.push(step.description.as_str());
            parts.push(step.expected_result.as_str());
        }
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn contains_text(&self, needle: &str, case_sensitive: bool) -> bool {
        let haystack = self.all_text();
        if case_sensitive {
            haystack.contains(needle)
        } else {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
    }

    /// Recompute `referenced_systems` from the current text.
    pub fn detect_referenced_systems(&mut self) {
        let content = self.all_text().to_lowercase();
        self.referenced_systems = SYSTEM_TERMS
            .iter()
            .filter(|term| content.contains(*term))
            .map(|term| (*term).to_string())
            .collect();
    }
}

/// Detected shape of the test case identifiers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdPattern {
    /// Anchored, case-insensitive regular expression matching a whole id.
    pub pattern: String,
    pub description: String,
    /// Fraction of identifiers matched by `pattern`.
    pub confidence: f64,
    pub sample_ids: Vec<String>,
    pub prefix: Option<String>,
    pub separator: Option<String>,
    pub number_part: Option<String>,
}

impl IdPattern {
    /// Callers treat anything below this as an unknown pattern.
    pub const RELIABLE_CONFIDENCE: f64 = 0.7;

    pub fn unknown(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn is_reliable(&self) -> bool {
        self.confidence >= Self::RELIABLE_CONFIDENCE && !self.pattern.is_empty()
    }

    /// Build a placeholder id in the detected shape, e.g. `TC-9999-NEW`.
    pub fn generate_new_id(&self, suffix: &str) -> String {
        let prefix = self.prefix.as_deref().filter(|p| !p.is_empty());
        let separator = self.separator.as_deref().filter(|s| !s.is_empty());
        match (prefix, separator) {
            (Some(prefix), Some(sep)) => format!("{prefix}{sep}9999{sep}{suffix}"),
            (Some(prefix), None) => format!("{prefix}9999{suffix}"),
            _ => format!("TC-9999-{suffix}"),
        }
    }
}

/// The parsed test case export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestCaseDocument {
    pub test_cases: Vec<TestCase>,
    pub sheet_names: Vec<String>,
    pub selected_sheet: String,
    /// Name of the adapter that extracted the test cases.
    pub format_name: String,
    pub id_pattern: IdPattern,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl TestCaseDocument {
    pub fn test_case(&self, id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|tc| tc.id == id)
    }

    pub fn test_ids(&self) -> Vec<&str> {
        self.test_cases.iter().map(|tc| tc.id.as_str()).collect()
    }

    pub fn total_test_cases(&self) -> usize {
        self.test_cases.len()
    }

    pub fn total_steps(&self) -> usize {
        self.test_cases.iter().map(TestCase::step_count).sum()
    }

    pub fn average_steps(&self) -> f64 {
        if self.test_cases.is_empty() {
            0.0
        } else {
            self.total_steps() as f64 / self.test_cases.len() as f64
        }
    }

    pub fn containing_text(&self, needle: &str, case_sensitive: bool) -> Vec<&TestCase> {
        self.test_cases
            .iter()
            .filter(|tc| tc.contains_text(needle, case_sensitive))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> TestCase {
        let mut tc = TestCase::new("TC-0001", "Vendor inbound sync");
        tc.description = "Send a request to the proxy".to_string();
        tc.steps = vec![
            TestStep::new(1, "Open NetSuite", "Vendor record visible"),
            TestStep::new(2, "Check VendorId", ""),
        ];
        tc
    }

    #[test]
    fn all_text_skips_empty_parts() {
        let tc = sample_case();
        assert_eq!(
            tc.all_text(),
            "Vendor inbound sync Send a request to the proxy Open NetSuite \
             Vendor record visible Check VendorId"
        );
    }

    #[test]
    fn referenced_systems_follow_vocabulary_order() {
        let mut tc = sample_case();
        tc.detect_referenced_systems();
        assert_eq!(
            tc.referenced_systems,
            vec!["vendor", "proxy", "netsuite", "inbound", "request"]
        );
    }

    #[test]
    fn generate_new_id_uses_components() {
        let pattern = IdPattern {
            pattern: "^TC-?\\d+$".to_string(),
            description: "TC-#### format".to_string(),
            confidence: 1.0,
            sample_ids: vec![],
            prefix: Some("TC".to_string()),
            separator: Some("-".to_string()),
            number_part: Some("0001".to_string()),
        };
        assert!(pattern.is_reliable());
        assert_eq!(pattern.generate_new_id("NEW"), "TC-9999-NEW");
        assert_eq!(IdPattern::unknown("none").generate_new_id("X"), "TC-9999-X");
    }
}
