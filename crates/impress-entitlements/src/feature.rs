//! Core feature types.

use serde::{Deserialize, Serialize};

/// A single product feature that can be switched on or off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "native", derive(uniffi::Record))]
pub struct FeatureDefinition {
    /// Stable token used as the flag key everywhere (config files, lookups).
    pub key: String,
    pub label: String,
    pub description: String,
    pub category: String,
}

impl FeatureDefinition {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Case-insensitive substring match over key, label, description and category.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.key, &self.label, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Handle to a feature that has been validated against a [`crate::Catalog`].
///
/// Only the catalog hands these out, so holding one means the key exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub(crate) usize);

impl FeatureId {
    /// Position of the feature in catalog declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}
