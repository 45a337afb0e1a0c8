//! Build domain tabs and mappings from raw adapter output.

use sttm_model::{ChangeType, Mapping, MappingDocument, Tab, TabChangeCategory};
use tracing::debug;

use super::raw::{RawMapping, RawTab};

/// Converts raw tabs into a [`MappingDocument`] regardless of which adapter
/// produced them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffConverter;

impl DiffConverter {
    pub fn convert(&self, raw_tabs: Vec<RawTab>, format_name: &str) -> MappingDocument {
        let mut document = MappingDocument {
            format_name: format_name.to_string(),
            ..MappingDocument::default()
        };
        for raw in raw_tabs {
            let labelled_unchanged = raw.change_type.trim().eq_ignore_ascii_case("unchanged");
            let tab = self.convert_tab(raw);
            if labelled_unchanged && !tab.has_changes() {
                document.unchanged_tabs.push(tab);
            } else {
                document.changed_tabs.push(tab);
            }
        }
        document
    }

    pub fn convert_tab(&self, raw: RawTab) -> Tab {
        let counts = (raw.added.len(), raw.deleted.len(), raw.modified.len());
        let change_category = match TabChangeCategory::parse(&raw.change_type) {
            Some(TabChangeCategory::Unchanged) if counts != (0, 0, 0) => {
                TabChangeCategory::from_counts(counts.0, counts.1, counts.2)
            }
            Some(category) => category,
            None => {
                let derived = TabChangeCategory::from_counts(counts.0, counts.1, counts.2);
                debug!(
                    tab = %raw.name,
                    label = %raw.change_type,
                    derived = %derived,
                    "unrecognised tab category, derived from mapping counts"
                );
                derived
            }
        };

        let convert_all = |mappings: Vec<RawMapping>, change_type: ChangeType| -> Vec<Mapping> {
            mappings
                .into_iter()
                .map(|raw| convert_mapping(raw, change_type))
                .collect()
        };

        Tab {
            name: raw.name,
            change_category,
            logical_name: raw.logical_name,
            physical_name_v1: raw.physical_name_v1,
            physical_name_v2: raw.physical_name_v2,
            version_v1: raw.version_v1,
            version_v2: raw.version_v2,
            source_system: raw.source_system,
            target_system: raw.target_system,
            added: convert_all(raw.added, ChangeType::Added),
            deleted: convert_all(raw.deleted, ChangeType::Deleted),
            modified: convert_all(raw.modified, ChangeType::Modified),
            unchanged: convert_all(raw.unchanged, ChangeType::Unchanged),
        }
    }
}

fn convert_mapping(raw: RawMapping, change_type: ChangeType) -> Mapping {
    Mapping {
        source_field: raw.source_field,
        target_field: raw.target_field,
        source_canonical_name: raw.source_canonical_name,
        target_canonical_name: raw.target_canonical_name,
        target_entity: raw.target_entity,
        source_description: raw.source_description,
        source_type: raw.source_type,
        target_type: raw.target_type,
        target_length: raw.target_length,
        source_sample_data: raw.source_sample_data,
        target_comments: raw.target_comments,
        completion_type: raw.completion_type,
        change_type,
        row_number: raw.row_number,
        original_row_number: raw.original_row_number,
        field_changes: raw.field_changes,
        other_fields: raw.other_fields,
    }
}
