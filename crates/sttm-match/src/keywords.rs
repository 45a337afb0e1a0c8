//! Keyword extraction from tab names.

use std::sync::LazyLock;

use regex::Regex;

/// Words too common to say anything about a tab.
pub const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "from", "into"];

static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-_.]+").expect("valid keyword delimiter regex"));

/// Split `text` into searchable keywords.
///
/// Tokens are trimmed of surrounding punctuation and dropped when shorter
/// than `min_length` characters, all digits, or a stop word. Duplicates are
/// removed case-insensitively, keeping the first spelling.
pub fn extract_keywords(text: &str, min_length: usize) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in DELIMITERS.split(text) {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.chars().count() < min_length || word.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let lower = word.to_lowercase();
        if STOP_WORDS.contains(&lower.as_str()) {
            continue;
        }
        if keywords.iter().any(|k| k.to_lowercase() == lower) {
            continue;
        }
        keywords.push(word.to_string());
    }
    keywords
}
