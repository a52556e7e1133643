//! impress-entitlements: feature catalog, subscription tiers, and flag state.
//!
//! A [`Catalog`] fixes the set of product features (grouped into categories)
//! and the tiers that bundle them. A [`FlagStore`] holds one boolean per
//! catalog feature plus the tier it was last set to, and exposes the
//! mutation and query API used by the app's settings screens. Configurations
//! travel as JSON strings through [`FlagStore::export`] / [`FlagStore::import`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use impress_entitlements::{Catalog, FlagStore};
//!
//! let catalog = Arc::new(Catalog::builtin().unwrap());
//! let mut store = FlagStore::new(catalog);
//! store.set_tier("starter").unwrap();
//! store.toggle("aiVision").unwrap();
//!
//! let saved = store.export().unwrap();
//! store.reset();
//! store.import(&saved).unwrap();
//! assert!(store.get("aiVision").unwrap());
//! ```

#[cfg(feature = "native")]
uniffi::setup_scaffolding!();

pub mod builtin;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod feature;
pub mod query;
pub mod shared;
pub mod state;
pub mod store;
pub mod tier;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use feature::*;
pub use query::*;
pub use shared::*;
pub use state::*;
pub use store::*;
pub use tier::*;
