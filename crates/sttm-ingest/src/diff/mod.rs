//! Mapping-diff ingestion: adapter selection, raw extraction, conversion.

pub mod adapter;
pub mod converter;
pub mod current;
pub mod legacy;
pub mod raw;
pub mod worksheet;

use std::path::Path;

use serde_json::Value;
use sttm_model::MappingDocument;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

pub use adapter::{AdapterRegistry, MappingDiffAdapter, Selection};
pub use converter::DiffConverter;
pub use current::CurrentFormatAdapter;
pub use legacy::LegacyFormatAdapter;
pub use raw::{RawMapping, RawTab};
pub use worksheet::WorksheetChangesAdapter;

/// Parses mapping-diff JSON into a [`MappingDocument`].
#[derive(Debug, Default)]
pub struct MappingDiffParser {
    registry: AdapterRegistry,
    converter: DiffConverter,
}

impl MappingDiffParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: AdapterRegistry) -> Self {
        Self {
            registry,
            converter: DiffConverter,
        }
    }

    /// Add an adapter ahead of the built-ins.
    pub fn register_adapter(&mut self, adapter: Box<dyn MappingDiffAdapter>) {
        info!(format = adapter.format_name(), "registered mapping diff adapter");
        self.registry.register(adapter);
    }

    pub fn supported_formats(&self) -> Vec<&str> {
        self.registry.format_names()
    }

    pub fn parse_file(&self, path: &Path) -> Result<MappingDocument> {
        if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(IngestError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let data: Value =
            serde_json::from_str(&text).map_err(|source| IngestError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "parsing mapping diff");
        self.parse_value(&data)
    }

    /// Parse an already decoded document.
    pub fn parse_value(&self, data: &Value) -> Result<MappingDocument> {
        let Selection { adapter, fallback } = self.registry.select(data);
        let mut warnings = Vec::new();
        if fallback {
            let message = format!(
                "no adapter recognised the mapping diff structure, using '{}'",
                adapter.format_name()
            );
            warn!("{message}");
            warnings.push(message);
        } else {
            debug!(format = adapter.format_name(), "selected mapping diff adapter");
        }

        let raw_tabs = adapter.extract_raw_data(data);
        if fallback && raw_tabs.is_empty() {
            return Err(IngestError::NoTabsExtracted {
                fallback: adapter.format_name().to_string(),
            });
        }

        let mut document = self.converter.convert(raw_tabs, adapter.format_name());
        document.warnings = warnings;
        info!(
            format = %document.format_name,
            changed_tabs = document.changed_tabs.len(),
            unchanged_tabs = document.unchanged_tabs.len(),
            total_changes = document.total_changes(),
            "parsed mapping diff"
        );
        Ok(document)
    }
}

/// Parse a mapping diff file with the built-in adapters.
pub fn parse_mapping_diff_file(path: &Path) -> Result<MappingDocument> {
    MappingDiffParser::new().parse_file(path)
}
