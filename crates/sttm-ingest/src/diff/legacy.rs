//! Legacy layout with tabs keyed by name at the top level.
//!
//! ```json
//! {
//!   "changed_tabs": {
//!     "Vendor": { "type": "deletions_only", "deleted": [{ "source_field": "VendorId", "target_field": "vendor_id" }] }
//!   },
//!   "unchanged_tabs": { "Dealer": {} }
//! }
//! ```

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::adapter::MappingDiffAdapter;
use super::raw::{RawMapping, RawTab, array_field, text_field, u64_field};

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyFormatAdapter;

impl LegacyFormatAdapter {
    pub const NAME: &'static str = "Legacy STTM v1.0";

    fn extract_tab(name: &str, tab: &Map<String, Value>, is_changed: bool) -> RawTab {
        let change_type = if is_changed {
            text_field(tab, &["type", "change_type"]).unwrap_or_else(|| "unknown".to_string())
        } else {
            "unchanged".to_string()
        };
        let mut raw = RawTab::new(name, change_type);
        raw.source_system = text_field(tab, &["source_system"]);
        raw.target_system = text_field(tab, &["target_system"]);
        raw.added = Self::extract_mappings(name, tab, "added");
        raw.deleted = Self::extract_mappings(name, tab, "deleted");
        raw.modified = Self::extract_mappings(name, tab, "modified");
        raw.unchanged = Self::extract_mappings(name, tab, "unchanged");
        raw
    }

    fn extract_mappings(tab_name: &str, tab: &Map<String, Value>, key: &str) -> Vec<RawMapping> {
        let mut mappings = Vec::new();
        for (index, entry) in array_field(tab, key).iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                trace!(tab = tab_name, key, index, "skipping non-object mapping entry");
                continue;
            };
            let mut raw = RawMapping::new(
                text_field(entry, &["source_field", "Source Field"]).unwrap_or_default(),
                text_field(entry, &["target_field", "Target Field"]).unwrap_or_default(),
            );
            raw.source_type = text_field(entry, &["source_type"]);
            raw.target_type = text_field(entry, &["target_type"]);
            raw.source_sample_data = text_field(entry, &["sample_data", "source_sample_data"]);
            raw.row_number = u64_field(entry, "row");
            mappings.push(raw);
        }
        mappings
    }
}

impl MappingDiffAdapter for LegacyFormatAdapter {
    fn format_name(&self) -> &str {
        Self::NAME
    }

    fn validate_format(&self, data: &Value) -> bool {
        data.get("changed_tabs").is_some() && data.get("unchanged_tabs").is_some()
    }

    fn extract_raw_data(&self, data: &Value) -> Vec<RawTab> {
        let mut tabs = Vec::new();
        for (key, is_changed) in [("changed_tabs", true), ("unchanged_tabs", false)] {
            let Some(section) = data.get(key).and_then(Value::as_object) else {
                continue;
            };
            for (name, tab) in section {
                let empty = Map::new();
                let tab = tab.as_object().unwrap_or(&empty);
                tabs.push(Self::extract_tab(name, tab, is_changed));
            }
        }
        debug!(tabs = tabs.len(), "extracted tabs from legacy format");
        tabs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_named_tabs() {
        let data = json!({
            "changed_tabs": {
                "Vendor": {
                    "type": "deletions_only",
                    "deleted": [{"source_field": "VendorId", "target_field": "vendor_id", "row": 4}]
                }
            },
            "unchanged_tabs": {"Dealer": {}}
        });
        assert!(LegacyFormatAdapter.validate_format(&data));

        let tabs = LegacyFormatAdapter.extract_raw_data(&data);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].name, "Vendor");
        assert_eq!(tabs[0].change_type, "deletions_only");
        assert_eq!(tabs[0].deleted[0].row_number, Some(4));
        assert_eq!(tabs[1].change_type, "unchanged");
    }
}
