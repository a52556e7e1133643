//! Flag state values and the seeds they are built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::feature::FeatureId;
use crate::tier::{TierId, TierMarker};

/// One boolean per catalog feature, plus the tier marker.
///
/// A `FlagState` is always built against a [`Catalog`] and holds exactly one
/// value per catalog feature, in catalog order. The fields are private so
/// that no caller can add or drop a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagState {
    flags: Vec<bool>,
    tier: TierMarker,
}

impl FlagState {
    /// Every feature set to `enabled`, tier marker custom.
    pub fn uniform(catalog: &Catalog, enabled: bool) -> Self {
        Self {
            flags: vec![enabled; catalog.len()],
            tier: TierMarker::Custom,
        }
    }

    /// Exactly the tier's features enabled, marker set to the tier.
    pub(crate) fn from_tier(catalog: &Catalog, tier: TierId) -> Self {
        Self {
            flags: catalog.tier_mask(tier).to_vec(),
            tier: TierMarker::Tier(tier),
        }
    }

    /// Values taken from `entries`; unknown keys are ignored and missing
    /// keys default to `false`. The marker is custom.
    pub fn from_entries<'a, I>(catalog: &Catalog, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut state = Self::uniform(catalog, false);
        for (key, enabled) in entries {
            match catalog.resolve(key) {
                Ok(id) => state.flags[id.0] = enabled,
                Err(_) => tracing::debug!("Ignoring unknown feature key '{}' in seed", key),
            }
        }
        state
    }

    pub(crate) fn from_parts(flags: Vec<bool>, tier: TierMarker) -> Self {
        Self { flags, tier }
    }

    pub(crate) fn get(&self, id: FeatureId) -> bool {
        self.flags[id.0]
    }

    pub fn tier(&self) -> TierMarker {
        self.tier
    }

    /// Values in catalog order.
    pub fn values(&self) -> &[bool] {
        &self.flags
    }

    /// Number of features tracked (equals the catalog size).
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn count_enabled(&self) -> usize {
        self.flags.iter().filter(|v| **v).count()
    }

    /// `(key, enabled)` pairs in catalog order.
    pub fn entries<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        catalog
            .features()
            .iter()
            .zip(&self.flags)
            .map(|(def, enabled)| (def.key.as_str(), *enabled))
    }

    /// Whether the flags are exactly the tier's feature set.
    pub(crate) fn matches_tier(&self, catalog: &Catalog, tier: TierId) -> bool {
        self.flags == catalog.tier_mask(tier)
    }

    pub(crate) fn set(&mut self, id: FeatureId, enabled: bool) {
        self.flags[id.0] = enabled;
    }

    pub(crate) fn fill(&mut self, enabled: bool) {
        self.flags.iter_mut().for_each(|v| *v = enabled);
    }

    pub(crate) fn set_marker(&mut self, tier: TierMarker) {
        self.tier = tier;
    }
}

/// How a store is populated at initialization; `reset` returns to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Seed {
    /// Every feature off.
    #[default]
    AllDisabled,
    /// Exactly the named tier's features on.
    Tier(String),
    /// Explicit per-key values; unknown keys ignored, missing keys off.
    Explicit(BTreeMap<String, bool>),
}

impl Seed {
    /// Build the state this seed describes.
    pub fn build(&self, catalog: &Catalog) -> Result<FlagState> {
        match self {
            Seed::AllDisabled => Ok(FlagState::uniform(catalog, false)),
            Seed::Tier(id) => {
                let tier = catalog.resolve_tier(id)?;
                Ok(FlagState::from_tier(catalog, tier))
            }
            Seed::Explicit(map) => Ok(FlagState::from_entries(
                catalog,
                map.iter().map(|(k, v)| (k.as_str(), *v)),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntitlementError;
    use crate::feature::FeatureDefinition;
    use crate::tier::TierDefinition;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                FeatureDefinition::new("a", "Alpha", "X", ""),
                FeatureDefinition::new("b", "Beta", "X", ""),
                FeatureDefinition::new("c", "Gamma", "Y", ""),
            ],
            vec![TierDefinition::new("starter", "Starter", 0.0, ["a"])],
        )
        .unwrap()
    }

    #[test]
    fn tier_seed_enables_exactly_tier_features() {
        let catalog = catalog();
        let state = Seed::Tier("starter".into()).build(&catalog).unwrap();
        assert_eq!(state.values(), [true, false, false]);
        assert_eq!(state.tier(), TierMarker::Tier(catalog.resolve_tier("starter").unwrap()));
    }

    #[test]
    fn explicit_seed_ignores_unknown_and_defaults_missing() {
        let catalog = catalog();
        let map = BTreeMap::from([("c".to_string(), true), ("zzz".to_string(), true)]);
        let state = Seed::Explicit(map).build(&catalog).unwrap();
        assert_eq!(state.values(), [false, false, true]);
        assert!(state.tier().is_custom());
        assert_eq!(state.len(), catalog.len());
    }

    #[test]
    fn unknown_tier_seed_fails() {
        let err = Seed::Tier("gold".into()).build(&catalog()).unwrap_err();
        assert_eq!(err, EntitlementError::UnknownTier("gold".into()));
    }

    #[test]
    fn entries_follow_catalog_order() {
        let catalog = catalog();
        let state = FlagState::uniform(&catalog, true);
        let keys: Vec<&str> = state.entries(&catalog).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(state.count_enabled(), 3);
    }

    #[test]
    fn seed_serializes_tagged() {
        let json = serde_json::to_string(&Seed::Tier("free".into())).unwrap();
        assert_eq!(json, r#"{"kind":"tier","value":"free"}"#);
        let back: Seed = serde_json::from_str(r#"{"kind":"all_disabled"}"#).unwrap();
        assert_eq!(back, Seed::AllDisabled);
    }
}
