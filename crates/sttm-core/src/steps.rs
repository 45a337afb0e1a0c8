//! Locate the steps of a test case that name a changed unit or field.
//!
//! Matching here is stricter than the scoring search: a term must appear as
//! a whole word, case-insensitively, optionally followed by one of the
//! configured plural suffixes.

use sttm_model::{Mapping, Tab, TestCase};

/// Whole-word terms for one changed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedStepFinder {
    /// Lower-cased terms, including singular forms of plural terms.
    terms: Vec<String>,
    suffixes: Vec<String>,
}

impl AffectedStepFinder {
    /// Terms are the changed field names plus every name the tab goes by.
    pub fn for_tab(tab: &Tab, suffixes: &[String]) -> Self {
        let suffixes: Vec<String> = suffixes
            .iter()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let display_name = tab.display_name();
        let names = tab
            .changed_mappings()
            .flat_map(Mapping::field_names)
            .chain(tab.known_names())
            .chain([display_name.as_str()]);

        let mut terms: Vec<String> = Vec::new();
        let mut add = |term: String| {
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        };
        for name in names {
            let term = name.trim().to_lowercase();
            for suffix in &suffixes {
                if let Some(stem) = term.strip_suffix(suffix.as_str()) {
                    add(stem.to_string());
                }
            }
            add(term);
        }
        Self { terms, suffixes }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Step numbers whose description or expected result mention a term,
    /// sorted and unique.
    pub fn find(&self, test_case: &TestCase) -> Vec<u32> {
        let mut steps: Vec<u32> = test_case
            .steps
            .iter()
            .filter(|step| self.mentions(&step.text()))
            .map(|step| step.step_number)
            .collect();
        steps.sort_unstable();
        steps.dedup();
        steps
    }

    pub fn mentions(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.terms
            .iter()
            .any(|term| contains_word(&text, term, &self.suffixes))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `term` occurs in `text` with word boundaries at both ends,
/// allowing one of `suffixes` before the closing boundary. A boundary is
/// only required where the term itself starts or ends with a word character.
fn contains_word(text: &str, term: &str, suffixes: &[String]) -> bool {
    let starts_with_word = term.chars().next().is_some_and(is_word_char);
    let ends_with_word = term.chars().next_back().is_some_and(is_word_char);
    for (start, _) in text.match_indices(term) {
        let before_ok = !starts_with_word
            || text[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
        if !before_ok {
            continue;
        }
        let rest = &text[start + term.len()..];
        let boundary = |tail: &str| !ends_with_word || tail.chars().next().is_none_or(|c| !is_word_char(c));
        if boundary(rest) {
            return true;
        }
        if suffixes
            .iter()
            .filter_map(|suffix| rest.strip_prefix(suffix.as_str()))
            .any(|tail| tail.chars().next().is_none_or(|c| !is_word_char(c)))
        {
            return true;
        }
    }
    false
}
