//! Header-to-role mapping for test case exports.

use std::collections::BTreeMap;
use std::fmt;

use rapidfuzz::distance::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a near-miss header to count.
pub const FUZZY_HEADER_THRESHOLD: f64 = 0.93;

/// Rows inspected when looking for the header row.
pub const HEADER_PROBE_ROWS: usize = 5;

/// Canonical meaning of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    Id,
    Name,
    Description,
    Precondition,
    StepNumber,
    StepDescription,
    StepExpectedResult,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 7] = [
        Self::Name,
        Self::Id,
        Self::Description,
        Self::Precondition,
        Self::StepNumber,
        Self::StepDescription,
        Self::StepExpectedResult,
    ];

    pub const REQUIRED: [ColumnRole; 2] = [Self::Id, Self::Name];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Precondition => "precondition",
            Self::StepNumber => "step_number",
            Self::StepDescription => "step_description",
            Self::StepExpectedResult => "step_expected",
        }
    }

    /// Lower-case header spellings accepted for this role.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name", "test_name", "test case name", "testcase name"],
            Self::Id => &["id", "test_id", "testcase id", "test case id"],
            Self::Description => &["description", "test_description", "test case description"],
            Self::Precondition => &[
                "precondition",
                "preconditions",
                "pre-condition",
                "prerequisite",
            ],
            Self::StepNumber => &["test step #", "step #", "step number", "step_number"],
            Self::StepDescription => &[
                "test step description",
                "step description",
                "step_description",
            ],
            Self::StepExpectedResult => &[
                "test step expected result",
                "expected result",
                "expected_result",
                "step_expected_result",
            ],
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column index per resolved role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<ColumnRole, usize>,
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.columns.get(&role).copied()
    }

    pub fn contains(&self, role: ColumnRole) -> bool {
        self.columns.contains_key(&role)
    }

    pub fn missing_required(&self) -> Vec<ColumnRole> {
        ColumnRole::REQUIRED
            .into_iter()
            .filter(|role| !self.contains(*role))
            .collect()
    }

    pub fn has_required(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Cell for `role` in `row`; empty when the role or the cell is missing.
    pub fn cell<'a>(&self, row: &'a [String], role: ColumnRole) -> &'a str {
        self.get(role)
            .and_then(|idx| row.get(idx))
            .map_or("", |cell| cell.trim())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve headers to roles.
///
/// Exact synonym hits are assigned first, leftmost header winning. Roles
/// still open are then paired with unassigned headers by Jaro-Winkler
/// similarity, closest pairs first.
pub fn map_columns(headers: &[String]) -> ColumnMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut map = ColumnMap::default();
    let mut taken = vec![false; headers.len()];

    for role in ColumnRole::ALL {
        let synonyms = role.synonyms();
        if let Some(idx) = normalized
            .iter()
            .enumerate()
            .position(|(i, h)| !taken[i] && synonyms.contains(&h.as_str()))
        {
            map.columns.insert(role, idx);
            taken[idx] = true;
        }
    }

    let mut near_misses = Vec::new();
    for role in ColumnRole::ALL.into_iter().filter(|r| !map.contains(*r)) {
        for (idx, header) in normalized.iter().enumerate() {
            if taken[idx] || header.is_empty() {
                continue;
            }
            let score = role
                .synonyms()
                .iter()
                .map(|syn| jaro_winkler::similarity(header.chars(), syn.chars()))
                .fold(0.0_f64, f64::max);
            if score >= FUZZY_HEADER_THRESHOLD {
                near_misses.push((score, role, idx));
            }
        }
    }
    // Closest pairs claim their header first.
    near_misses.sort_by(|a, b| b.0.total_cmp(&a.0));
    for (_, role, idx) in near_misses {
        if !map.contains(role) && !taken[idx] {
            map.columns.insert(role, idx);
            taken[idx] = true;
        }
    }

    map
}

/// Index of the first leading row whose cells resolve both id and name.
/// Falls back to the first row.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    rows.iter()
        .take(HEADER_PROBE_ROWS)
        .position(|row| map_columns(row).has_required())
        .unwrap_or(0)
}
