//! Validated feature and tier catalog.
//!
//! A [`Catalog`] is built once, checked for internal consistency, and never
//! mutated afterwards. It is the only place free-form key strings are turned
//! into [`FeatureId`] / [`TierId`] handles.

use std::collections::HashMap;

use crate::builtin;
use crate::error::{CatalogError, EntitlementError, Result};
use crate::feature::{FeatureDefinition, FeatureId};
use crate::tier::{TierDefinition, TierId, CUSTOM_TIER};

/// The fixed set of features and the tiers that bundle them.
#[derive(Debug, Clone)]
pub struct Catalog {
    features: Vec<FeatureDefinition>,
    tiers: Vec<TierDefinition>,
    feature_index: HashMap<String, FeatureId>,
    tier_index: HashMap<String, TierId>,
    /// Category names in order of first appearance.
    categories: Vec<String>,
    /// Per tier, one entry per feature in catalog order.
    tier_masks: Vec<Vec<bool>>,
}

impl Catalog {
    /// Build a catalog from feature and tier tables.
    ///
    /// Tiers must be listed from lowest to highest capability.
    pub fn new(
        features: Vec<FeatureDefinition>,
        tiers: Vec<TierDefinition>,
    ) -> std::result::Result<Self, CatalogError> {
        let mut feature_index = HashMap::with_capacity(features.len());
        let mut categories: Vec<String> = Vec::new();

        for (i, def) in features.iter().enumerate() {
            if def.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey);
            }
            if def.category.trim().is_empty() {
                return Err(CatalogError::EmptyCategory(def.key.clone()));
            }
            if feature_index.insert(def.key.clone(), FeatureId(i)).is_some() {
                return Err(CatalogError::DuplicateFeature(def.key.clone()));
            }
            if !categories.contains(&def.category) {
                categories.push(def.category.clone());
            }
        }

        let mut tier_index = HashMap::with_capacity(tiers.len());
        let mut tier_masks = Vec::with_capacity(tiers.len());

        for (i, tier) in tiers.iter().enumerate() {
            if tier.id.trim().is_empty() {
                return Err(CatalogError::EmptyTierId);
            }
            if tier.id == CUSTOM_TIER {
                return Err(CatalogError::ReservedTierId(tier.id.clone()));
            }
            if tier_index.insert(tier.id.clone(), TierId(i)).is_some() {
                return Err(CatalogError::DuplicateTier(tier.id.clone()));
            }
            if !tier.price.is_finite() || tier.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    tier: tier.id.clone(),
                    price: tier.price,
                });
            }

            let mut mask = vec![false; features.len()];
            for key in &tier.features {
                match feature_index.get(key) {
                    Some(id) => mask[id.0] = true,
                    None => {
                        return Err(CatalogError::UnknownTierFeature {
                            tier: tier.id.clone(),
                            feature: key.clone(),
                        })
                    }
                }
            }
            tier_masks.push(mask);
        }

        Ok(Self {
            features,
            tiers,
            feature_index,
            tier_index,
            categories,
            tier_masks,
        })
    }

    /// The product catalog shipped with the app.
    pub fn builtin() -> std::result::Result<Self, CatalogError> {
        Self::new(builtin::feature_definitions(), builtin::tier_definitions())
    }

    /// All features in declaration order.
    pub fn features(&self) -> &[FeatureDefinition] {
        &self.features
    }

    /// All tiers from lowest to highest capability.
    pub fn tiers(&self) -> &[TierDefinition] {
        &self.tiers
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Category names in order of first appearance.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Validate a feature key.
    pub fn resolve(&self, key: &str) -> Result<FeatureId> {
        self.feature_index
            .get(key)
            .copied()
            .ok_or_else(|| EntitlementError::UnknownFeatureKey(key.to_string()))
    }

    /// Validate a tier id.
    pub fn resolve_tier(&self, id: &str) -> Result<TierId> {
        self.tier_index
            .get(id)
            .copied()
            .ok_or_else(|| EntitlementError::UnknownTier(id.to_string()))
    }

    /// Ids handed out by this catalog always index in bounds.
    pub(crate) fn feature(&self, id: FeatureId) -> &FeatureDefinition {
        &self.features[id.0]
    }

    pub(crate) fn tier(&self, id: TierId) -> &TierDefinition {
        &self.tiers[id.0]
    }

    /// Checked lookup for a tier handle that may come from another catalog.
    pub fn tier_definition(&self, id: TierId) -> Option<&TierDefinition> {
        self.tiers.get(id.0)
    }

    /// Feature ids in declaration order.
    pub fn feature_ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        (0..self.features.len()).map(FeatureId)
    }

    /// Tier ids from lowest to highest capability.
    pub fn tier_ids(&self) -> impl Iterator<Item = TierId> + '_ {
        (0..self.tiers.len()).map(TierId)
    }

    /// The tier one step above `id`, if there is one.
    pub fn next_tier(&self, id: TierId) -> Option<TierId> {
        let next = id.0 + 1;
        (next < self.tiers.len()).then_some(TierId(next))
    }

    /// The lowest-capability tier, if the catalog defines any.
    pub fn lowest_tier(&self) -> Option<TierId> {
        (!self.tiers.is_empty()).then_some(TierId(0))
    }

    /// Enabled/disabled values implied by a tier, in catalog order.
    pub(crate) fn tier_mask(&self, id: TierId) -> &[bool] {
        &self.tier_masks[id.0]
    }

    /// Whether every tier includes all features of the tier below it.
    pub fn tiers_are_cumulative(&self) -> bool {
        self.tier_masks.windows(2).all(|pair| {
            pair[0]
                .iter()
                .zip(&pair[1])
                .all(|(lower, higher)| !*lower || *higher)
        })
    }

    /// Feature keys for which `pred` holds on a catalog-aligned slice.
    pub(crate) fn keys_where<'a>(
        &'a self,
        values: &'a [bool],
        pred: impl Fn(bool) -> bool + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.features
            .iter()
            .zip(values)
            .filter(move |(_, v)| pred(**v))
            .map(|(def, _)| def.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::new(
            vec![
                FeatureDefinition::new("a", "Alpha", "X", "first"),
                FeatureDefinition::new("b", "Beta", "X", "second"),
                FeatureDefinition::new("c", "Gamma", "Y", "third"),
            ],
            vec![
                TierDefinition::new("starter", "Starter", 0.0, ["a"]),
                TierDefinition::new("pro", "Pro", 10.0, ["a", "b", "c"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolves_known_keys() {
        let catalog = small_catalog();
        assert_eq!(catalog.resolve("b").unwrap().index(), 1);
        assert_eq!(
            catalog.resolve("zzz"),
            Err(EntitlementError::UnknownFeatureKey("zzz".into()))
        );
        assert_eq!(
            catalog.resolve_tier("gold"),
            Err(EntitlementError::UnknownTier("gold".into()))
        );
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let catalog = small_catalog();
        assert_eq!(catalog.categories(), ["X", "Y"]);
        assert!(catalog.has_category("Y"));
        assert!(!catalog.has_category("Z"));
    }

    #[test]
    fn rejects_duplicate_feature() {
        let err = Catalog::new(
            vec![
                FeatureDefinition::new("a", "A", "X", ""),
                FeatureDefinition::new("a", "A again", "X", ""),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateFeature("a".into()));
    }

    #[test]
    fn rejects_tier_with_unknown_feature() {
        let err = Catalog::new(
            vec![FeatureDefinition::new("a", "A", "X", "")],
            vec![TierDefinition::new("free", "Free", 0.0, ["a", "b"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownTierFeature {
                tier: "free".into(),
                feature: "b".into()
            }
        );
    }

    #[test]
    fn rejects_negative_price_and_duplicate_tier() {
        let features = vec![FeatureDefinition::new("a", "A", "X", "")];
        let err = Catalog::new(
            features.clone(),
            vec![TierDefinition::new("free", "Free", -1.0, Vec::<String>::new())],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPrice { .. }));

        let err = Catalog::new(
            features,
            vec![
                TierDefinition::new("free", "Free", 0.0, ["a"]),
                TierDefinition::new("free", "Free", 0.0, ["a"]),
            ],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTier("free".into()));
    }

    #[test]
    fn rejects_reserved_tier_id() {
        let err = Catalog::new(
            vec![FeatureDefinition::new("a", "A", "X", "")],
            vec![TierDefinition::new("custom", "Custom", 0.0, ["a"])],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::ReservedTierId("custom".into()));
    }

    #[test]
    fn rejects_empty_tier_id_and_category() {
        let err = Catalog::new(
            vec![FeatureDefinition::new("a", "A", "X", "")],
            vec![TierDefinition::new("", "Nameless", 0.0, ["a"])],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::EmptyTierId);

        let err = Catalog::new(vec![FeatureDefinition::new("a", "A", "  ", "")], vec![])
            .unwrap_err();
        assert_eq!(err, CatalogError::EmptyCategory("a".into()));
    }

    #[test]
    fn checked_tier_lookup() {
        let catalog = small_catalog();
        assert_eq!(catalog.tier_definition(TierId(1)).unwrap().id, "pro");
        assert!(catalog.tier_definition(TierId(7)).is_none());
    }

    #[test]
    fn rejects_empty_key() {
        let err = Catalog::new(vec![FeatureDefinition::new(" ", "A", "X", "")], vec![])
            .unwrap_err();
        assert_eq!(err, CatalogError::EmptyKey);
    }

    #[test]
    fn next_tier_walks_capability_order() {
        let catalog = small_catalog();
        let starter = catalog.resolve_tier("starter").unwrap();
        let pro = catalog.next_tier(starter).unwrap();
        assert_eq!(catalog.tier(pro).id, "pro");
        assert_eq!(catalog.next_tier(pro), None);
        assert_eq!(catalog.lowest_tier(), Some(starter));
        assert!(catalog.tiers_are_cumulative());
    }

    #[test]
    fn builtin_catalog_is_valid_and_cumulative() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.tiers().len(), 5);
        assert!(catalog.tiers_are_cumulative());
        let top = catalog.tier_ids().last().unwrap();
        assert!(catalog.tier_mask(top).iter().all(|v| *v));
    }
}
