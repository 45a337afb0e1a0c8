//! Choose the sheet that holds the test cases.

/// Sheet names containing any of these are covers or notes.
const SKIP_PATTERNS: &[&str] = &["cover", "summary", "index", "readme", "instruction"];

/// Names suggesting test data, highest priority first.
const TEST_SHEET_PATTERNS: &[&str] = &[
    "vendor",
    "inbound",
    "test",
    "testcase",
    "test case",
    "tests",
    "tc",
    "qtest",
    "md-",
    "main",
    "data",
];

/// Pick a test sheet: exact pattern hits, then substring hits, then the
/// first sheet that is not a cover, then the first sheet.
pub fn select_test_sheet(sheet_names: &[String]) -> Option<&str> {
    let candidates: Vec<&str> = sheet_names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            let lower = name.to_lowercase();
            !SKIP_PATTERNS.iter().any(|skip| lower.contains(skip))
        })
        .collect();
    let candidates = if candidates.is_empty() {
        sheet_names.iter().map(String::as_str).collect()
    } else {
        candidates
    };

    for pattern in TEST_SHEET_PATTERNS {
        if let Some(name) = candidates.iter().find(|name| name.to_lowercase() == *pattern) {
            return Some(*name);
        }
    }
    for pattern in TEST_SHEET_PATTERNS {
        if let Some(name) = candidates
            .iter()
            .find(|name| name.to_lowercase().contains(pattern))
        {
            return Some(*name);
        }
    }
    candidates.first().copied()
}
