//! The flag store: current state plus the mutation API.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::codec;
use crate::config::EngineConfig;
use crate::error::{EntitlementError, Result};
use crate::state::{FlagState, Seed};
use crate::tier::{TierDefinition, TierLabelPolicy, TierMarker, CUSTOM_TIER};

/// Owns the one [`FlagState`] of a session.
///
/// Every mutation either succeeds completely or returns an error and leaves
/// the state untouched.
#[derive(Debug, Clone)]
pub struct FlagStore {
    catalog: Arc<Catalog>,
    state: FlagState,
    seed: FlagState,
    tier_label: TierLabelPolicy,
}

impl FlagStore {
    /// A store with every feature disabled and a sticky tier label.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let state = FlagState::uniform(&catalog, false);
        Self {
            catalog,
            seed: state.clone(),
            state,
            tier_label: TierLabelPolicy::default(),
        }
    }

    /// A store seeded and labeled according to `config`.
    pub fn with_config(catalog: Arc<Catalog>, config: &EngineConfig) -> Result<Self> {
        let mut store = Self::new(catalog);
        store.tier_label = config.tier_label;
        store.initialize(&config.seed)?;
        Ok(store)
    }

    /// Replace the state with `seed` and remember it as the reset target.
    pub fn initialize(&mut self, seed: &Seed) -> Result<()> {
        let state = seed.build(&self.catalog)?;
        tracing::info!(
            "Initialized flag store: {} of {} features enabled",
            state.count_enabled(),
            state.len()
        );
        self.seed = state.clone();
        self.state = state;
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handle to the catalog.
    pub fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn state(&self) -> &FlagState {
        &self.state
    }

    /// The state `reset` restores.
    pub fn seed(&self) -> &FlagState {
        &self.seed
    }

    pub fn tier_label_policy(&self) -> TierLabelPolicy {
        self.tier_label
    }

    pub fn set_tier_label_policy(&mut self, policy: TierLabelPolicy) {
        self.tier_label = policy;
    }

    /// Whether a feature is enabled.
    pub fn get(&self, key: &str) -> Result<bool> {
        let id = self.catalog.resolve(key)?;
        Ok(self.state.get(id))
    }

    /// Like [`get`](Self::get), but unknown keys read as disabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        match self.get(key) {
            Ok(enabled) => enabled,
            Err(err) => {
                tracing::debug!("{}, reading as disabled", err);
                false
            }
        }
    }

    pub fn tier_marker(&self) -> TierMarker {
        self.state.tier()
    }

    /// The recorded tier, or `None` for a custom configuration.
    pub fn current_tier(&self) -> Option<&TierDefinition> {
        self.state.tier().tier().map(|id| self.catalog.tier(id))
    }

    // --- Mutations ---------------------------------------------------------

    /// Flip one feature; returns its new value.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        let id = self.catalog.resolve(key)?;
        let enabled = !self.state.get(id);
        self.state.set(id, enabled);
        tracing::debug!("Toggled feature '{}' to {}", key, enabled);
        self.apply_tier_label();
        Ok(enabled)
    }

    /// Set one feature explicitly.
    pub fn set(&mut self, key: &str, enabled: bool) -> Result<()> {
        let id = self.catalog.resolve(key)?;
        self.state.set(id, enabled);
        tracing::debug!("Set feature '{}' to {}", key, enabled);
        self.apply_tier_label();
        Ok(())
    }

    pub fn enable_all(&mut self) {
        self.state.fill(true);
        tracing::debug!("Enabled all {} features", self.state.len());
        self.apply_tier_label();
    }

    pub fn disable_all(&mut self) {
        self.state.fill(false);
        tracing::debug!("Disabled all {} features", self.state.len());
        self.apply_tier_label();
    }

    /// Enable or disable every feature in a category.
    pub fn set_category(&mut self, category: &str, enabled: bool) -> Result<()> {
        if !self.catalog.has_category(category) {
            return Err(EntitlementError::UnknownCategory(category.to_string()));
        }
        let ids: Vec<_> = self
            .catalog
            .feature_ids()
            .filter(|id| self.catalog.feature(*id).category == category)
            .collect();
        for id in &ids {
            self.state.set(*id, enabled);
        }
        tracing::debug!(
            "Set {} features in category '{}' to {}",
            ids.len(),
            category,
            enabled
        );
        self.apply_tier_label();
        Ok(())
    }

    /// Restore the state captured at initialization.
    pub fn reset(&mut self) {
        self.state = self.seed.clone();
        tracing::info!("Reset flag store to its initial configuration");
    }

    /// Replace the enabled set with exactly the tier's features.
    pub fn set_tier(&mut self, tier_id: &str) -> Result<()> {
        let tier = self.catalog.resolve_tier(tier_id)?;
        self.state = FlagState::from_tier(&self.catalog, tier);
        tracing::info!(
            "Applied tier '{}' ({} features)",
            tier_id,
            self.state.count_enabled()
        );
        Ok(())
    }

    /// Move to the next tier up.
    ///
    /// Returns the applied tier, or `None` if already at the top.
    pub fn upgrade(&mut self) -> Result<Option<&TierDefinition>> {
        let current = self.state.tier().tier().ok_or(EntitlementError::NoActiveTier)?;
        let Some(next) = self.catalog.next_tier(current) else {
            tracing::debug!("Already on the highest tier");
            return Ok(None);
        };
        self.state = FlagState::from_tier(&self.catalog, next);
        let tier = self.catalog.tier(next);
        tracing::info!("Upgraded to tier '{}'", tier.id);
        Ok(Some(tier))
    }

    // --- Import/export -----------------------------------------------------

    /// Serialize the current state (see [`codec::export`]).
    pub fn export(&self) -> Result<String> {
        codec::export(&self.catalog, &self.state)
    }

    pub fn export_pretty(&self) -> Result<String> {
        codec::export_pretty(&self.catalog, &self.state)
    }

    /// Replace the state with a parsed configuration.
    ///
    /// On error the current state is kept.
    pub fn import(&mut self, text: &str) -> Result<()> {
        let state = codec::import(&self.catalog, text)?;
        self.replace_state(state);
        Ok(())
    }

    pub(crate) fn replace_state(&mut self, state: FlagState) {
        tracing::info!(
            "Imported configuration: {} of {} features enabled, tier '{}'",
            state.count_enabled(),
            state.len(),
            codec::tier_token(&self.catalog, state.tier()).unwrap_or(CUSTOM_TIER)
        );
        self.state = state;
    }

    fn apply_tier_label(&mut self) {
        if self.tier_label != TierLabelPolicy::Reconcile {
            return;
        }
        if let TierMarker::Tier(id) = self.state.tier() {
            if !self.state.matches_tier(&self.catalog, id) {
                tracing::debug!(
                    "Flags diverged from tier '{}', marking configuration custom",
                    self.catalog.tier(id).id
                );
                self.state.set_marker(TierMarker::Custom);
            }
        }
    }
}
