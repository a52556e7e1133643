//! Read-only queries over a flag store: counts, grouping, search, tiers.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::feature::FeatureDefinition;
use crate::store::FlagStore;
use crate::tier::TierDefinition;

/// Feature keys of one category, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub keys: Vec<&'a str>,
}

/// Enabled/total counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native", derive(uniffi::Record))]
pub struct CategorySummary {
    pub name: String,
    pub enabled: u32,
    pub total: u32,
}

/// Which features a filter keeps by state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

impl StatusFilter {
    pub fn matches(&self, enabled: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Enabled => enabled,
            StatusFilter::Disabled => !enabled,
        }
    }
}

/// Combined text, category and status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFilter {
    pub text: String,
    pub category: Option<String>,
    pub status: StatusFilter,
}

impl FeatureFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }
}

/// Features gained and lost when switching tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDiff<'a> {
    pub added: Vec<&'a str>,
    pub removed: Vec<&'a str>,
}

impl FlagStore {
    pub fn count_enabled(&self) -> usize {
        self.state().count_enabled()
    }

    /// Catalog size.
    pub fn count_total(&self) -> usize {
        self.catalog().len()
    }

    /// Enabled feature keys in catalog order.
    pub fn enabled_keys(&self) -> Vec<&str> {
        self.catalog()
            .keys_where(self.state().values(), |enabled| enabled)
            .collect()
    }

    /// Categories in first-declaration order with their feature keys.
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        let catalog = self.catalog();
        catalog
            .categories()
            .iter()
            .map(|name| CategoryGroup {
                name: name.as_str(),
                keys: catalog
                    .features()
                    .iter()
                    .filter(|def| def.category == *name)
                    .map(|def| def.key.as_str())
                    .collect(),
            })
            .collect()
    }

    /// Enabled features in a category; 0 for an unknown category.
    pub fn count_enabled_in_category(&self, category: &str) -> usize {
        self.catalog()
            .features()
            .iter()
            .zip(self.state().values())
            .filter(|(def, enabled)| **enabled && def.category == category)
            .count()
    }

    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.group_by_category()
            .into_iter()
            .map(|group| CategorySummary {
                name: group.name.to_string(),
                enabled: self.count_enabled_in_category(group.name) as u32,
                total: group.keys.len() as u32,
            })
            .collect()
    }

    /// Features whose key, label, description or category contains `query`
    /// (case-insensitive). A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&FeatureDefinition> {
        let needle = query.trim().to_lowercase();
        self.catalog()
            .features()
            .iter()
            .filter(|def| needle.is_empty() || def.matches_lowercase(&needle))
            .collect()
    }

    /// Search narrowed by category and enabled state.
    pub fn filter(&self, filter: &FeatureFilter) -> Vec<&FeatureDefinition> {
        let needle = filter.text.trim().to_lowercase();
        self.catalog()
            .features()
            .iter()
            .zip(self.state().values())
            .filter(|(def, enabled)| {
                filter.status.matches(**enabled)
                    && filter
                        .category
                        .as_deref()
                        .map_or(true, |category| def.category == category)
                    && (needle.is_empty() || def.matches_lowercase(&needle))
            })
            .map(|(def, _)| def)
            .collect()
    }

    /// Lowest tier that includes every enabled feature.
    pub fn required_tier(&self) -> Option<&TierDefinition> {
        let catalog = self.catalog();
        let values = self.state().values();
        catalog
            .tier_ids()
            .find(|id| {
                catalog
                    .tier_mask(*id)
                    .iter()
                    .zip(values)
                    .all(|(included, enabled)| *included || !*enabled)
            })
            .map(|id| catalog.tier(id))
    }

    /// Price of the recorded tier; `None` for a custom configuration.
    pub fn current_price(&self) -> Option<f64> {
        self.current_tier().map(|tier| tier.price)
    }

    /// Features added and removed when moving from one tier to another.
    pub fn tier_diff(&self, from: &str, to: &str) -> Result<TierDiff<'_>> {
        let catalog = self.catalog();
        let from = catalog.tier_mask(catalog.resolve_tier(from)?);
        let to = catalog.tier_mask(catalog.resolve_tier(to)?);

        let mut diff = TierDiff {
            added: Vec::new(),
            removed: Vec::new(),
        };
        for ((def, before), after) in catalog.features().iter().zip(from).zip(to) {
            match (before, after) {
                (false, true) => diff.added.push(def.key.as_str()),
                (true, false) => diff.removed.push(def.key.as_str()),
                _ => {}
            }
        }
        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::EntitlementError;
    use crate::tier::TierDefinition;
    use std::sync::Arc;

    fn store() -> FlagStore {
        let catalog = Catalog::new(
            vec![
                FeatureDefinition::new("a", "Alpha", "X", "route optimizer"),
                FeatureDefinition::new("b", "Beta", "X", "charts"),
                FeatureDefinition::new("c", "Gamma", "Y", "vision"),
            ],
            vec![
                TierDefinition::new("starter", "Starter", 0.0, ["a"]),
                TierDefinition::new("pro", "Pro", 49.0, ["a", "b"]),
                TierDefinition::new("max", "Max", 99.0, ["a", "b", "c"]),
            ],
        )
        .unwrap();
        FlagStore::new(Arc::new(catalog))
    }

    #[test]
    fn counts() {
        let mut store = store();
        store.set_tier("starter").unwrap();
        store.toggle("b").unwrap();
        assert_eq!(store.count_enabled(), 2);
        assert_eq!(store.count_total(), 3);
        assert_eq!(store.count_enabled_in_category("X"), 2);
        assert_eq!(store.count_enabled_in_category("Y"), 0);
        assert_eq!(store.count_enabled_in_category("nope"), 0);
        assert_eq!(store.enabled_keys(), vec!["a", "b"]);
    }

    #[test]
    fn groups_by_category_in_order() {
        let store = store();
        let groups = store.group_by_category();
        assert_eq!(
            groups,
            vec![
                CategoryGroup { name: "X", keys: vec!["a", "b"] },
                CategoryGroup { name: "Y", keys: vec!["c"] },
            ]
        );
    }

    #[test]
    fn summaries() {
        let mut store = store();
        store.toggle("c").unwrap();
        let summaries = store.category_summaries();
        assert_eq!(summaries[0], CategorySummary { name: "X".into(), enabled: 0, total: 2 });
        assert_eq!(summaries[1], CategorySummary { name: "Y".into(), enabled: 1, total: 1 });
    }

    #[test]
    fn search_is_case_insensitive_over_all_fields() {
        let store = store();
        let keys = |q: &str| -> Vec<String> {
            store.search(q).iter().map(|d| d.key.clone()).collect()
        };
        assert_eq!(keys("GAMMA"), vec!["c"]);
        assert_eq!(keys("chart"), vec!["b"]);
        assert_eq!(keys("x"), vec!["a", "b"]);
        assert_eq!(keys(""), vec!["a", "b", "c"]);
        assert_eq!(keys("   "), vec!["a", "b", "c"]);
        assert!(keys("missing").is_empty());
    }

    #[test]
    fn filter_combines_criteria() {
        let mut store = store();
        store.set_tier("pro").unwrap();
        let keys = |f: FeatureFilter| -> Vec<String> {
            store.filter(&f).iter().map(|d| d.key.clone()).collect()
        };
        assert_eq!(keys(FeatureFilter::default().with_status(StatusFilter::Disabled)), vec!["c"]);
        assert_eq!(
            keys(FeatureFilter::default().in_category("X").with_status(StatusFilter::Enabled)),
            vec!["a", "b"]
        );
        assert_eq!(keys(FeatureFilter::text("beta").in_category("Y")), Vec::<String>::new());
    }

    #[test]
    fn required_tier_covers_enabled_flags() {
        let mut store = store();
        assert_eq!(store.required_tier().unwrap().id, "starter");
        store.toggle("b").unwrap();
        assert_eq!(store.required_tier().unwrap().id, "pro");
        store.toggle("c").unwrap();
        assert_eq!(store.required_tier().unwrap().id, "max");
    }

    #[test]
    fn price_follows_tier() {
        let mut store = store();
        assert_eq!(store.current_price(), None);
        store.set_tier("pro").unwrap();
        assert_eq!(store.current_price(), Some(49.0));
    }

    #[test]
    fn tier_diff_lists_gains_and_losses() {
        let store = store();
        let diff = store.tier_diff("starter", "max").unwrap();
        assert_eq!(diff.added, vec!["b", "c"]);
        assert!(diff.removed.is_empty());
        let diff = store.tier_diff("max", "pro").unwrap();
        assert_eq!(diff.removed, vec!["c"]);
        assert_eq!(
            store.tier_diff("starter", "gold"),
            Err(EntitlementError::UnknownTier("gold".into()))
        );
    }
}
