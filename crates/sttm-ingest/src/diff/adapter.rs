//! Pluggable mapping-diff format adapters.

use serde_json::Value;

use super::current::CurrentFormatAdapter;
use super::legacy::LegacyFormatAdapter;
use super::raw::RawTab;
use super::worksheet::WorksheetChangesAdapter;

/// Extracts raw tabs from one on-disk diff schema.
///
/// Supporting a new schema means implementing this trait and registering
/// the adapter; nothing downstream of [`RawTab`] changes.
pub trait MappingDiffAdapter: Send + Sync {
    /// Human-readable name of the handled format.
    fn format_name(&self) -> &str;

    /// Whether this adapter understands `data`.
    fn validate_format(&self, data: &Value) -> bool;

    /// Pull tabs and mappings out of `data`. Malformed records are skipped.
    fn extract_raw_data(&self, data: &Value) -> Vec<RawTab>;
}

/// Adapter chosen for a document.
pub struct Selection<'a> {
    pub adapter: &'a dyn MappingDiffAdapter,
    /// True when no adapter validated and the default was used.
    pub fallback: bool,
}

/// Ordered adapters; the first whose `validate_format` accepts wins.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn MappingDiffAdapter>>,
    fallback: Box<dyn MappingDiffAdapter>,
}

impl AdapterRegistry {
    /// Registry holding only `fallback`, which is never tried by validation.
    pub fn empty(fallback: Box<dyn MappingDiffAdapter>) -> Self {
        Self {
            adapters: Vec::new(),
            fallback,
        }
    }

    /// Insert ahead of every adapter already registered.
    pub fn register(&mut self, adapter: Box<dyn MappingDiffAdapter>) {
        self.adapters.insert(0, adapter);
    }

    pub fn select(&self, data: &Value) -> Selection<'_> {
        match self.adapters.iter().find(|a| a.validate_format(data)) {
            Some(adapter) => Selection {
                adapter: adapter.as_ref(),
                fallback: false,
            },
            None => Selection {
                adapter: self.fallback.as_ref(),
                fallback: true,
            },
        }
    }

    /// Format names in priority order.
    pub fn format_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.format_name()).collect()
    }
}

impl Default for AdapterRegistry {
    /// Built-in adapters, with the current report format as the fallback.
    fn default() -> Self {
        let mut registry = Self::empty(Box::new(CurrentFormatAdapter));
        registry.register(Box::new(WorksheetChangesAdapter));
        registry.register(Box::new(LegacyFormatAdapter));
        registry.register(Box::new(CurrentFormatAdapter));
        registry
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.format_names())
            .field("fallback", &self.fallback.format_name())
            .finish()
    }
}
