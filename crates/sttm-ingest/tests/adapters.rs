//! Mapping diff parsing through the public parser, including a format
//! plugged in from outside the crate.

use std::io::Write;

use serde_json::{Value, json};
use sttm_ingest::{
    CurrentFormatAdapter, IngestError, LegacyFormatAdapter, MappingDiffAdapter, MappingDiffParser,
    RawMapping, RawTab, WorksheetChangesAdapter, parse_mapping_diff_file,
};
use sttm_model::{ChangeType, TabChangeCategory};

/// `{"format": "simple", "tabs": [{"name", "changes": [{"type", "from", "to"}]}]}`
struct SimpleFormatAdapter;

impl MappingDiffAdapter for SimpleFormatAdapter {
    fn format_name(&self) -> &str {
        "Simple Change List"
    }

    fn validate_format(&self, data: &Value) -> bool {
        data.get("format").and_then(Value::as_str) == Some("simple")
    }

    fn extract_raw_data(&self, data: &Value) -> Vec<RawTab> {
        let tabs = data.get("tabs").and_then(Value::as_array).cloned().unwrap_or_default();
        tabs.iter()
            .filter_map(|tab| {
                let mut raw = RawTab::new(tab.get("name")?.as_str()?, "mixed");
                for change in tab.get("changes")?.as_array()? {
                    let from = change.get("from").and_then(Value::as_str).unwrap_or_default();
                    let to = change.get("to").and_then(Value::as_str).unwrap_or_default();
                    let mapping = RawMapping::new(from, to);
                    match change.get("type").and_then(Value::as_str) {
                        Some("add") => raw.added.push(mapping),
                        Some("delete") => raw.deleted.push(mapping),
                        Some("modify") => raw.modified.push(mapping),
                        _ => {}
                    }
                }
                Some(raw)
            })
            .collect()
    }
}

fn simple_diff() -> Value {
    json!({
        "format": "simple",
        "tabs": [{
            "name": "Vendor Master",
            "changes": [
                {"type": "add", "from": "NewField", "to": "new_field"},
                {"type": "delete", "from": "OldField", "to": "old_field"},
                {"type": "modify", "from": "VendorId", "to": "vendor_id"},
                {"type": "rename", "from": "Ignored", "to": "ignored"}
            ]
        }]
    })
}

fn current_diff() -> Value {
    json!({
        "report_metadata": {"generated_at": "2024-05-01T10:00:00"},
        "detailed_changes": {
            "changed_tabs": [{
                "tab_name": "Vendor Inbound",
                "change_type": "deletions_only",
                "source_system": "NetSuite",
                "target_system": "D365",
                "version_metadata": {
                    "logical_name": "Vendor Inbound",
                    "physical_name_v1": "Vendor Inbound",
                    "physical_name_v2": "Vendor Inbound v2",
                    "version_v1": 1,
                    "version_v2": 2
                },
                "mappings": {
                    "deleted_mappings": [
                        {
                            "mapping_fields": {"Source Field": "VendorId", "Target Field": "VENDOR_ID"},
                            "other_fields": {"Source Sample Data": "V-1001"}
                        }
                    ],
                    "unchanged_mappings": [
                        {"mapping_fields": {"Source Field": "VendorName", "Target Field": "NAME"}}
                    ]
                }
            }],
            "unchanged_tabs": [{"tab_name": "Dealer", "change_type": "unchanged"}]
        }
    })
}

#[test]
fn externally_registered_adapter_takes_priority() {
    let mut parser = MappingDiffParser::new();
    parser.register_adapter(Box::new(SimpleFormatAdapter));
    assert_eq!(parser.supported_formats()[0], "Simple Change List");

    let document = parser.parse_value(&simple_diff()).unwrap();
    assert_eq!(document.format_name, "Simple Change List");
    assert!(document.warnings.is_empty());
    assert_eq!(document.changed_tabs.len(), 1);

    let tab = &document.changed_tabs[0];
    assert_eq!(tab.name, "Vendor Master");
    assert_eq!(tab.change_category, TabChangeCategory::Mixed);
    assert_eq!((tab.added.len(), tab.deleted.len(), tab.modified.len()), (1, 1, 1));
    assert_eq!(tab.total_mappings(), 3);
    assert_eq!(tab.deleted[0].change_type, ChangeType::Deleted);
}

#[test]
fn builtin_formats_are_recognised() {
    let parser = MappingDiffParser::new();
    let formats = parser.supported_formats();
    assert!(formats.contains(&CurrentFormatAdapter::NAME));
    assert!(formats.contains(&LegacyFormatAdapter::NAME));
    assert!(formats.contains(&WorksheetChangesAdapter::NAME));

    let document = parser.parse_value(&current_diff()).unwrap();
    assert_eq!(document.format_name, CurrentFormatAdapter::NAME);
    assert!(document.warnings.is_empty());
    assert_eq!(document.changed_tabs.len(), 1);
    assert_eq!(document.unchanged_tabs.len(), 1);

    let tab = &document.changed_tabs[0];
    assert_eq!(tab.change_category, TabChangeCategory::DeletionsOnly);
    assert_eq!(tab.deleted[0].source_field, "VendorId");
    assert_eq!(tab.deleted[0].source_sample_data.as_deref(), Some("V-1001"));
    assert_eq!(tab.unchanged.len(), 1);
    assert!(tab.has_version_changes());
    assert_eq!(document.total_changes(), 1);
}

#[test]
fn parses_diff_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", current_diff()).unwrap();
    let document = parse_mapping_diff_file(file.path()).unwrap();
    assert_eq!(document.changed_units().count(), 1);
}

#[test]
fn reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let err = parse_mapping_diff_file(&missing).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let err = parse_mapping_diff_file(&broken).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn directory_is_not_a_diff_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_mapping_diff_file(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::NotAFile { .. }));
    assert!(err.is_validation());
    assert!(err.to_string().starts_with("not a file: "));
}
