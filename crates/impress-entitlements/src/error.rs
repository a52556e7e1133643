//! Error types for impress-entitlements

use thiserror::Error;

/// Result type alias for entitlement operations
pub type Result<T> = std::result::Result<T, EntitlementError>;

/// Main error type for store, query, and codec operations.
///
/// Every operation that returns one of these leaves the flag state exactly
/// as it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "native", derive(uniffi::Error), uniffi(flat_error))]
pub enum EntitlementError {
    /// Key is not part of the feature catalog
    #[error("Unknown feature key: {0}")]
    UnknownFeatureKey(String),

    /// Tier id is not part of the tier catalog
    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    /// Category name is not used by any catalog feature
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Import text is not a well-formed configuration document
    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    /// A serialized flag value cannot be read as a boolean
    #[error("Invalid value for flag '{key}': {value}")]
    InvalidFlagValue { key: String, value: String },

    /// Tier-relative operation attempted while the configuration is custom
    #[error("No active tier: configuration is custom")]
    NoActiveTier,

    /// Catalog construction or engine configuration failed validation
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A shared store lock was poisoned by a panicking writer
    #[error("Flag store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Catalog validation errors, raised while building a [`crate::Catalog`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Feature key must not be empty")]
    EmptyKey,

    #[error("Feature '{0}' has an empty category")]
    EmptyCategory(String),

    #[error("Tier id must not be empty")]
    EmptyTierId,

    #[error("Duplicate feature key: {0}")]
    DuplicateFeature(String),

    #[error("Duplicate tier id: {0}")]
    DuplicateTier(String),

    #[error("Tier id '{0}' is reserved")]
    ReservedTierId(String),

    #[error("Tier '{tier}' references unknown feature '{feature}'")]
    UnknownTierFeature { tier: String, feature: String },

    #[error("Tier '{tier}' has invalid price {price}")]
    InvalidPrice { tier: String, price: f64 },
}

impl From<serde_json::Error> for EntitlementError {
    fn from(err: serde_json::Error) -> Self {
        EntitlementError::MalformedConfig(err.to_string())
    }
}
