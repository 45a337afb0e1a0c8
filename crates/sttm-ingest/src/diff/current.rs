//! Current difference report layout.
//!
//! ```json
//! {
//!   "report_metadata": { ... },
//!   "detailed_changes": {
//!     "changed_tabs": [{
//!       "tab_name": "...", "change_type": "mixed",
//!       "version_metadata": { "logical_name": "...", "physical_name_v1": "...", ... },
//!       "mappings": {
//!         "added_mappings": [{ "mapping_fields": {...}, "other_fields": {...}, "row_number": 4 }],
//!         "deleted_mappings": [...],
//!         "modified_mappings": [{ ..., "field_changes": { "Target Type": { "old_value": "...", "new_value": "..." } } }]
//!       }
//!     }],
//!     "unchanged_tabs": [...]
//!   }
//! }
//! ```

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::adapter::MappingDiffAdapter;
use super::raw::{
    RawMapping, RawTab, array_field, field_changes, i64_field, object_field, text_field,
    u64_field,
};

const SOURCE_FIELD_KEYS: &[&str] = &["Source Field", "source_field"];
const TARGET_FIELD_KEYS: &[&str] = &["Target Field", "target_field"];
const SAMPLE_DATA_KEYS: &[&str] = &["Source Sample Data", "source_sample_data"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentFormatAdapter;

impl CurrentFormatAdapter {
    pub const NAME: &'static str = "Excel Comparison Tool v2.0";

    fn extract_tab(tab: &Map<String, Value>, is_changed: bool) -> RawTab {
        let name = text_field(tab, &["tab_name"]).unwrap_or_else(|| "Unknown".to_string());
        let change_type = if is_changed {
            text_field(tab, &["change_type"]).unwrap_or_else(|| "unchanged".to_string())
        } else {
            "unchanged".to_string()
        };
        let mut raw = RawTab::new(name, change_type);
        raw.source_system = text_field(tab, &["source_system"]);
        raw.target_system = text_field(tab, &["target_system"]);

        if let Some(meta) = object_field(tab, "version_metadata") {
            raw.logical_name = text_field(meta, &["logical_name"]);
            raw.physical_name_v1 = text_field(meta, &["physical_name_v1"]);
            raw.physical_name_v2 = text_field(meta, &["physical_name_v2"]);
            raw.version_v1 = i64_field(meta, "version_v1");
            raw.version_v2 = i64_field(meta, "version_v2");
        }

        if let Some(mappings) = object_field(tab, "mappings") {
            raw.added = Self::extract_mappings(&raw.name, mappings, "added_mappings");
            raw.deleted = Self::extract_mappings(&raw.name, mappings, "deleted_mappings");
            raw.modified = Self::extract_mappings(&raw.name, mappings, "modified_mappings");
            raw.unchanged = Self::extract_mappings(&raw.name, mappings, "unchanged_mappings");
        }
        raw
    }

    fn extract_mappings(tab_name: &str, mappings: &Map<String, Value>, key: &str) -> Vec<RawMapping> {
        array_field(mappings, key)
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry.as_object() {
                Some(entry) => Some(extract_mapping(entry)),
                None => {
                    trace!(tab = tab_name, key, index, "skipping non-object mapping entry");
                    None
                }
            })
            .collect()
    }
}

/// Read one mapping record in the current layout.
pub(crate) fn extract_mapping(entry: &Map<String, Value>) -> RawMapping {
    let empty = Map::new();
    let fields = object_field(entry, "mapping_fields").unwrap_or(&empty);
    let other = object_field(entry, "other_fields").unwrap_or(&empty);

    let mut raw = RawMapping::new(
        text_field(fields, SOURCE_FIELD_KEYS).unwrap_or_default(),
        text_field(fields, TARGET_FIELD_KEYS).unwrap_or_default(),
    );
    raw.source_canonical_name = text_field(fields, &["Source Canonical Name"]);
    raw.target_canonical_name = text_field(fields, &["Target Canonical Name"]);
    raw.target_entity = text_field(fields, &["Target Entity"]);
    raw.source_description = text_field(other, &["Source Description"]);
    raw.source_type = text_field(other, &["Source Type"]);
    raw.target_type = text_field(other, &["Target Type"]);
    raw.target_length = text_field(other, &["Target Length"]);
    raw.target_comments = text_field(other, &["Target Comments"]);
    raw.completion_type = text_field(other, &["Completion Type"]);
    raw.row_number = u64_field(entry, "row_number");
    raw.original_row_number = u64_field(entry, "original_row_number");
    raw.field_changes = field_changes(object_field(entry, "field_changes"));
    raw.source_sample_data = raw
        .field_changes
        .get("source_sample_data")
        .and_then(|change| change.new_value.clone())
        .or_else(|| text_field(fields, SAMPLE_DATA_KEYS))
        .or_else(|| text_field(other, SAMPLE_DATA_KEYS));
    raw.other_fields = other.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    raw
}

impl MappingDiffAdapter for CurrentFormatAdapter {
    fn format_name(&self) -> &str {
        Self::NAME
    }

    fn validate_format(&self, data: &Value) -> bool {
        data.get("report_metadata").is_some() && data.get("detailed_changes").is_some()
    }

    fn extract_raw_data(&self, data: &Value) -> Vec<RawTab> {
        let Some(details) = data.get("detailed_changes").and_then(Value::as_object) else {
            return Vec::new();
        };
        let mut tabs = Vec::new();
        for (key, is_changed) in [("changed_tabs", true), ("unchanged_tabs", false)] {
            for (index, tab) in array_field(details, key).iter().enumerate() {
                match tab.as_object() {
                    Some(tab) => tabs.push(Self::extract_tab(tab, is_changed)),
                    None => trace!(key, index, "skipping non-object tab entry"),
                }
            }
        }
        debug!(tabs = tabs.len(), "extracted tabs from current format");
        tabs
    }
}
