//! Source-to-target mapping difference types.
//!
//! A [`MappingDocument`] is the adapter-independent view of an STTM
//! difference report: tabs (one per compared worksheet) holding field
//! mappings bucketed by how they changed between the two versions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a single mapping changed between the two compared versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Deleted,
    Modified,
    Unchanged,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }

    /// Parse the change labels used by the known diff formats.
    ///
    /// Accepts the past-tense labels (`added`) as well as the imperative
    /// forms (`add`, `insert`, `delete`, `update`, `modify`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "added" | "add" | "insert" | "inserted" => Some(Self::Added),
            "deleted" | "delete" | "removed" | "remove" => Some(Self::Deleted),
            "modified" | "modify" | "update" | "updated" | "changed" => Some(Self::Modified),
            "unchanged" | "same" => Some(Self::Unchanged),
            _ => None,
        }
    }

    /// True for the three kinds that count toward a tab's total changes.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab-level classification of the changes it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabChangeCategory {
    Mixed,
    AdditionsOnly,
    DeletionsOnly,
    ModificationsOnly,
    #[default]
    Unchanged,
}

impl TabChangeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::AdditionsOnly => "additions_only",
            Self::DeletionsOnly => "deletions_only",
            Self::ModificationsOnly => "modifications_only",
            Self::Unchanged => "unchanged",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "mixed" => Some(Self::Mixed),
            "additions_only" => Some(Self::AdditionsOnly),
            "deletions_only" => Some(Self::DeletionsOnly),
            "modifications_only" => Some(Self::ModificationsOnly),
            "unchanged" => Some(Self::Unchanged),
            _ => None,
        }
    }

    /// Derive the category from bucket sizes.
    pub fn from_counts(added: usize, deleted: usize, modified: usize) -> Self {
        match (added > 0, deleted > 0, modified > 0) {
            (false, false, false) => Self::Unchanged,
            (true, false, false) => Self::AdditionsOnly,
            (false, true, false) => Self::DeletionsOnly,
            (false, false, true) => Self::ModificationsOnly,
            _ => Self::Mixed,
        }
    }
}

impl fmt::Display for TabChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after values of one attribute of a modified mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// A single source-field to target-field correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub source_field: String,
    pub target_field: String,
    pub source_canonical_name: Option<String>,
    pub target_canonical_name: Option<String>,
    pub target_entity: Option<String>,
    pub source_description: Option<String>,
    pub source_type: Option<String>,
    pub target_type: Option<String>,
    pub target_length: Option<String>,
    pub source_sample_data: Option<String>,
    pub target_comments: Option<String>,
    pub completion_type: Option<String>,
    pub change_type: ChangeType,
    pub row_number: Option<u64>,
    /// Row in the previous version (deleted mappings).
    pub original_row_number: Option<u64>,
    /// Attribute name to before/after values, populated for modifications.
    #[serde(default)]
    pub field_changes: BTreeMap<String, FieldChange>,
    /// Columns the adapters do not model, kept verbatim.
    #[serde(default)]
    pub other_fields: BTreeMap<String, serde_json::Value>,
}

impl Mapping {
    /// A mapping with only the two field names set.
    pub fn new(
        source_field: impl Into<String>,
        target_field: impl Into<String>,
        change_type: ChangeType,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            source_canonical_name: None,
            target_canonical_name: None,
            target_entity: None,
            source_description: None,
            source_type: None,
            target_type: None,
            target_length: None,
            source_sample_data: None,
            target_comments: None,
            completion_type: None,
            change_type,
            row_number: None,
            original_row_number: None,
            field_changes: BTreeMap::new(),
            other_fields: BTreeMap::new(),
        }
    }

    /// Source and target field names, skipping blanks.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        [self.source_field.as_str(), self.target_field.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_field, self.target_field)
    }
}

/// A named group of mappings, typically one worksheet of the STTM workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tab {
    pub name: String,
    pub change_category: TabChangeCategory,
    pub logical_name: Option<String>,
    pub physical_name_v1: Option<String>,
    pub physical_name_v2: Option<String>,
    pub version_v1: Option<i64>,
    pub version_v2: Option<i64>,
    pub source_system: Option<String>,
    pub target_system: Option<String>,
    pub added: Vec<Mapping>,
    pub deleted: Vec<Mapping>,
    pub modified: Vec<Mapping>,
    pub unchanged: Vec<Mapping>,
}

impl Tab {
    pub fn new(name: impl Into<String>, change_category: TabChangeCategory) -> Self {
        Self {
            name: name.into(),
            change_category,
            ..Self::default()
        }
    }

    /// Union of the four buckets in added, deleted, modified, unchanged order.
    pub fn all_mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.changed_mappings().chain(self.unchanged.iter())
    }

    /// Added, deleted and modified mappings.
    pub fn changed_mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.added
            .iter()
            .chain(self.deleted.iter())
            .chain(self.modified.iter())
    }

    pub fn total_mappings(&self) -> usize {
        self.total_changes() + self.unchanged.len()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len()
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Label showing the logical name and the physical names when they differ.
    pub fn display_name(&self) -> String {
        let Some(logical) = self.logical_name.as_deref() else {
            return self.name.clone();
        };
        let v1 = self.physical_name_v1.as_deref().unwrap_or_default();
        let v2 = self.physical_name_v2.as_deref().unwrap_or_default();
        if v1 == v2 {
            if v1.is_empty() || logical == v1 {
                logical.to_string()
            } else {
                format!("{logical} (as '{v1}')")
            }
        } else {
            format!("{logical} (v1: '{v1}', v2: '{v2}')")
        }
    }

    /// Every plain name the tab is known by: name, logical and physical names.
    pub fn known_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let candidates = [
            Some(self.name.as_str()),
            self.logical_name.as_deref(),
            self.physical_name_v1.as_deref(),
            self.physical_name_v2.as_deref(),
        ];
        for name in candidates.into_iter().flatten() {
            let name = name.trim();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn has_version_changes(&self) -> bool {
        self.physical_name_v1 != self.physical_name_v2 || self.version_v1 != self.version_v2
    }

    /// Short summary such as `"2 fields added, 1 fields deleted"`.
    pub fn change_summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("{} fields added", self.added.len()));
        }
        if !self.deleted.is_empty() {
            parts.push(format!("{} fields deleted", self.deleted.len()));
        }
        if !self.modified.is_empty() {
            parts.push(format!("{} fields modified", self.modified.len()));
        }
        if parts.is_empty() {
            "No changes detected".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// The parsed mapping difference document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub changed_tabs: Vec<Tab>,
    pub unchanged_tabs: Vec<Tab>,
    /// Name of the adapter that extracted this document.
    pub format_name: String,
    /// Non-fatal notes raised while parsing (fallback adapter, skipped records).
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl MappingDocument {
    pub fn all_tabs(&self) -> impl Iterator<Item = &Tab> {
        self.changed_tabs.iter().chain(self.unchanged_tabs.iter())
    }

    /// Changed tabs that carry at least one added, deleted or modified mapping.
    pub fn changed_units(&self) -> impl Iterator<Item = &Tab> {
        self.changed_tabs.iter().filter(|tab| tab.has_changes())
    }

    /// Case-insensitive lookup over all tabs.
    pub fn tab_by_name(&self, name: &str) -> Option<&Tab> {
        self.all_tabs().find(|tab| tab.name.eq_ignore_ascii_case(name))
    }

    pub fn total_tabs(&self) -> usize {
        self.changed_tabs.len() + self.unchanged_tabs.len()
    }

    pub fn total_mappings(&self) -> usize {
        self.all_tabs().map(Tab::total_mappings).sum()
    }

    pub fn total_changes(&self) -> usize {
        self.changed_tabs.iter().map(Tab::total_changes).sum()
    }

    pub fn all_changed_mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.changed_tabs.iter().flat_map(Tab::changed_mappings)
    }

    /// Number of changed tabs per category.
    pub fn tabs_by_category(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for tab in &self.changed_tabs {
            *counts.entry(tab.change_category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
