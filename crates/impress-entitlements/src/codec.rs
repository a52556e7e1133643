//! Configuration import/export.
//!
//! The wire format is a JSON object with two fields:
//!
//! ```text
//! {"flags": {"logistics": true, "aiVision": false, ...}, "tier": "professional"}
//! ```
//!
//! Flags are written in catalog declaration order, so exporting the same
//! state twice yields byte-identical text. On import, unknown keys are
//! ignored, missing keys default to `false`, and an unknown tier falls back
//! to `"custom"`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::error::{EntitlementError, Result};
use crate::state::FlagState;
use crate::tier::{TierMarker, CUSTOM_TIER};

#[derive(Serialize)]
struct ExportDocument<'a> {
    flags: FlagsView<'a>,
    tier: &'a str,
}

/// Serializes flags as a map in catalog order.
struct FlagsView<'a> {
    catalog: &'a Catalog,
    state: &'a FlagState,
}

impl Serialize for FlagsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.state.len()))?;
        for (key, enabled) in self.state.entries(self.catalog) {
            map.serialize_entry(key, &enabled)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct ImportDocument {
    flags: Map<String, Value>,
    #[serde(default)]
    tier: Option<String>,
}

/// Wire token for a tier marker; `None` if the tier is not in `catalog`.
pub(crate) fn tier_token(catalog: &Catalog, marker: TierMarker) -> Option<&str> {
    match marker {
        TierMarker::Tier(id) => catalog.tier_definition(id).map(|tier| tier.id.as_str()),
        TierMarker::Custom => Some(CUSTOM_TIER),
    }
}

fn document<'a>(catalog: &'a Catalog, state: &'a FlagState) -> Result<ExportDocument<'a>> {
    if state.len() != catalog.len() {
        return Err(EntitlementError::MalformedConfig(format!(
            "state has {} flags but catalog has {} features",
            state.len(),
            catalog.len()
        )));
    }
    let tier = tier_token(catalog, state.tier()).ok_or_else(|| {
        EntitlementError::MalformedConfig("state refers to a tier outside the catalog".to_string())
    })?;
    Ok(ExportDocument {
        flags: FlagsView { catalog, state },
        tier,
    })
}

/// Serialize a state to compact JSON.
pub fn export(catalog: &Catalog, state: &FlagState) -> Result<String> {
    Ok(serde_json::to_string(&document(catalog, state)?)?)
}

/// Serialize a state to indented JSON (same document as [`export`]).
pub fn export_pretty(catalog: &Catalog, state: &FlagState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&document(catalog, state)?)?)
}

/// Parse a configuration document into a new state.
///
/// Nothing is applied here; callers swap the returned state in only on
/// success.
pub fn import(catalog: &Catalog, text: &str) -> Result<FlagState> {
    let doc: ImportDocument = match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => serde_json::from_value(Value::Object(map))?,
        other => {
            return Err(EntitlementError::MalformedConfig(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut flags = Vec::with_capacity(catalog.len());
    for def in catalog.features() {
        let enabled = match doc.flags.get(&def.key) {
            Some(value) => coerce_flag(&def.key, value)?,
            None => false,
        };
        flags.push(enabled);
    }

    let ignored = doc
        .flags
        .keys()
        .filter(|key| catalog.resolve(key).is_err())
        .count();
    if ignored > 0 {
        tracing::debug!("Ignored {} unknown feature keys on import", ignored);
    }

    let tier = match doc.tier.as_deref() {
        None | Some(CUSTOM_TIER) => TierMarker::Custom,
        Some(id) => match catalog.resolve_tier(id) {
            Ok(tier) => TierMarker::Tier(tier),
            Err(_) => {
                tracing::warn!("Unknown tier '{}' on import, treating as custom", id);
                TierMarker::Custom
            }
        },
    };

    Ok(FlagState::from_parts(flags, tier))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read a serialized flag value as a boolean.
///
/// Accepts JSON booleans, the numbers `0`/`1`, and the strings
/// `"true"`/`"false"` (any case).
fn coerce_flag(key: &str, value: &Value) -> Result<bool> {
    let coerced = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };

    coerced.ok_or_else(|| EntitlementError::InvalidFlagValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
