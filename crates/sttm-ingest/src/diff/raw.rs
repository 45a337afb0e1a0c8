//! Format-agnostic records produced by the diff adapters.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sttm_model::FieldChange;

/// One mapping as an adapter found it; the bucket it sits in decides its
/// change type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMapping {
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
    pub row_number: Option<u64>,
    pub original_row_number: Option<u64>,
    pub field_changes: BTreeMap<String, FieldChange>,
    pub other_fields: BTreeMap<String, Value>,
}

impl RawMapping {
    pub fn new(source_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            ..Self::default()
        }
    }
}

/// One tab as an adapter found it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTab {
    pub name: String,
    /// Category label as written in the document, e.g. `mixed`.
    pub change_type: String,
    pub source_system: Option<String>,
    pub target_system: Option<String>,
    pub logical_name: Option<String>,
    pub physical_name_v1: Option<String>,
    pub physical_name_v2: Option<String>,
    pub version_v1: Option<i64>,
    pub version_v2: Option<i64>,
    pub added: Vec<RawMapping>,
    pub deleted: Vec<RawMapping>,
    pub modified: Vec<RawMapping>,
    pub unchanged: Vec<RawMapping>,
}

impl RawTab {
    pub fn new(name: impl Into<String>, change_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            change_type: change_type.into(),
            ..Self::default()
        }
    }

    pub fn mapping_count(&self) -> usize {
        self.added.len() + self.deleted.len() + self.modified.len() + self.unchanged.len()
    }
}

/// Render a scalar JSON value as text. Blank strings, null, arrays and
/// objects yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// First non-blank value among `keys`.
pub fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(value_text)
}

pub fn u64_field(object: &Map<String, Value>, key: &str) -> Option<u64> {
    match object.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn i64_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Child object under `key`, if present and an object.
pub fn object_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    object.get(key).and_then(Value::as_object)
}

/// Child array under `key`; missing or mistyped yields an empty slice.
pub fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Parse a `{field: {old_value, new_value}}` object.
pub fn field_changes(object: Option<&Map<String, Value>>) -> BTreeMap<String, FieldChange> {
    let Some(object) = object else {
        return BTreeMap::new();
    };
    object
        .iter()
        .map(|(name, change)| {
            let change = match change.as_object() {
                Some(values) => FieldChange {
                    old_value: values.get("old_value").and_then(value_text),
                    new_value: values.get("new_value").and_then(value_text),
                },
                None => FieldChange {
                    old_value: None,
                    new_value: value_text(change),
                },
            };
            (name.clone(), change)
        })
        .collect()
}
