//! Worksheet row-change layout (version 3.0).
//!
//! ```json
//! {
//!   "version": "3.0",
//!   "comparison_result": {
//!     "modified_worksheets": [{
//!       "worksheet_name": "Vendor",
//!       "row_changes": [{ "change_action": "UPDATE", "source_column": "Name", "target_column": "vendor_name", "before": "a", "after": "b" }]
//!     }]
//!   }
//! }
//! ```

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use sttm_model::FieldChange;
use tracing::{debug, trace};

use super::adapter::MappingDiffAdapter;
use super::raw::{RawMapping, RawTab, array_field, text_field};

#[derive(Debug, Clone, Copy, Default)]
pub struct WorksheetChangesAdapter;

impl WorksheetChangesAdapter {
    pub const NAME: &'static str = "STTM Comparison Tool v3.0";

    fn extract_tab(worksheet: &Map<String, Value>) -> RawTab {
        let name =
            text_field(worksheet, &["worksheet_name"]).unwrap_or_else(|| "Unknown".to_string());
        let changes = array_field(worksheet, "row_changes");

        let mut actions = BTreeSet::new();
        let mut raw = RawTab::new(name, "");
        for (index, change) in changes.iter().enumerate() {
            let Some(change) = change.as_object() else {
                trace!(worksheet = %raw.name, index, "skipping non-object row change");
                continue;
            };
            let action = text_field(change, &["change_action"])
                .unwrap_or_default()
                .to_uppercase();
            let mut mapping = RawMapping::new(
                text_field(change, &["source_column"]).unwrap_or_default(),
                text_field(change, &["target_column"]).unwrap_or_default(),
            );
            match action.as_str() {
                "INSERT" => raw.added.push(mapping),
                "DELETE" => raw.deleted.push(mapping),
                "UPDATE" => {
                    mapping.field_changes.insert(
                        "value".to_string(),
                        FieldChange {
                            old_value: text_field(change, &["before"]),
                            new_value: text_field(change, &["after"]),
                        },
                    );
                    raw.modified.push(mapping);
                }
                other => {
                    trace!(worksheet = %raw.name, index, action = other, "skipping unknown change action");
                    continue;
                }
            }
            actions.insert(action);
        }

        raw.change_type = match actions.len() {
            0 => "unchanged",
            1 if actions.contains("INSERT") => "additions_only",
            1 if actions.contains("DELETE") => "deletions_only",
            1 => "modifications_only",
            _ => "mixed",
        }
        .to_string();
        raw
    }
}

impl MappingDiffAdapter for WorksheetChangesAdapter {
    fn format_name(&self) -> &str {
        Self::NAME
    }

    fn validate_format(&self, data: &Value) -> bool {
        data.get("version").and_then(Value::as_str) == Some("3.0")
            && data
                .get("comparison_result")
                .and_then(|result| result.get("modified_worksheets"))
                .is_some()
    }

    fn extract_raw_data(&self, data: &Value) -> Vec<RawTab> {
        let Some(result) = data.get("comparison_result").and_then(Value::as_object) else {
            return Vec::new();
        };
        let tabs: Vec<RawTab> = array_field(result, "modified_worksheets")
            .iter()
            .filter_map(Value::as_object)
            .map(Self::extract_tab)
            .collect();
        debug!(tabs = tabs.len(), "extracted tabs from worksheet changes format");
        tabs
    }
}
