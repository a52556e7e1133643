//! Engine configuration (seed and tier-label policy).

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::state::Seed;
use crate::tier::TierLabelPolicy;

/// How a [`crate::FlagStore`] is initialized and how it labels its tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial state, also the target of `reset`.
    pub seed: Seed,
    /// Tier marker behavior after flag-level edits.
    pub tier_label: TierLabelPolicy,
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a tier instead of all-disabled.
    pub fn with_tier_seed(mut self, tier: impl Into<String>) -> Self {
        self.seed = Seed::Tier(tier.into());
        self
    }

    pub fn with_tier_label(mut self, policy: TierLabelPolicy) -> Self {
        self.tier_label = policy;
        self
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the configuration against a catalog.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        self.seed.build(catalog).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntitlementError;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, Seed::AllDisabled);
        assert_eq!(config.tier_label, TierLabelPolicy::Sticky);
        assert!(config.validate(&Catalog::builtin().unwrap()).is_ok());
    }

    #[test]
    fn test_json_serialization() {
        let config = EngineConfig::new()
            .with_tier_seed("starter")
            .with_tier_label(TierLabelPolicy::Reconcile);
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = EngineConfig::from_json(r#"{"tier_label":"reconcile"}"#).unwrap();
        assert_eq!(parsed.seed, Seed::AllDisabled);
        assert_eq!(parsed.tier_label, TierLabelPolicy::Reconcile);
    }

    #[test]
    fn test_unknown_seed_tier() {
        let config = EngineConfig::new().with_tier_seed("platinum");
        assert_eq!(
            config.validate(&Catalog::builtin().unwrap()),
            Err(EntitlementError::UnknownTier("platinum".into()))
        );
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig::new().with_tier_seed("free");
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }
}
