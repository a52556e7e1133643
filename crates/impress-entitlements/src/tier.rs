//! Subscription tiers and the tier marker carried by a flag state.

use serde::{Deserialize, Serialize};

/// Wire token for a configuration that does not correspond to any tier.
pub const CUSTOM_TIER: &str = "custom";

/// A named bundle of features sold at one price point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "native", derive(uniffi::Record))]
pub struct TierDefinition {
    pub id: String,
    pub name: String,
    /// Monthly price; non-negative.
    pub price: f64,
    /// Feature keys enabled when this tier is selected.
    pub features: Vec<String>,
}

impl TierDefinition {
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, price: f64, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this tier includes the given feature key.
    pub fn includes(&self, key: &str) -> bool {
        self.features.iter().any(|k| k == key)
    }
}

/// Handle to a tier validated against a [`crate::Catalog`].
///
/// Handles compare by capability rank (catalog declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TierId(pub(crate) usize);

impl TierId {
    /// Capability rank; 0 is the lowest tier.
    pub fn rank(self) -> usize {
        self.0
    }
}

/// Which tier a flag state was last set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TierMarker {
    /// Flags were last replaced wholesale by this tier.
    Tier(TierId),
    /// No tier describes the configuration.
    #[default]
    Custom,
}

impl TierMarker {
    pub fn tier(self) -> Option<TierId> {
        match self {
            Self::Tier(id) => Some(id),
            Self::Custom => None,
        }
    }

    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

/// What happens to the tier marker after a flag-level mutation
/// (toggle, set, enable/disable all, set category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierLabelPolicy {
    /// Keep the last applied tier as a historical label.
    #[default]
    Sticky,
    /// Switch to [`TierMarker::Custom`] once the flags no longer equal the
    /// recorded tier's exact feature set.
    Reconcile,
}
