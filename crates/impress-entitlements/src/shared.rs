//! Thread-safe handle to a single flag store.
//!
//! Hosts that serve several threads or sessions share one [`FlagStore`]
//! through a [`SharedFlagStore`]. Reads run under a shared lock; each
//! mutation runs as one closure under the write lock, so read-modify-write
//! sequences never interleave.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codec;
use crate::error::{EntitlementError, Result};
use crate::state::FlagState;
use crate::store::FlagStore;

/// Cloneable handle; all clones see the same store.
#[derive(Debug, Clone)]
pub struct SharedFlagStore {
    inner: Arc<RwLock<FlagStore>>,
}

impl SharedFlagStore {
    pub fn new(store: FlagStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, FlagStore>> {
        self.inner
            .read()
            .map_err(|e| EntitlementError::LockPoisoned(e.to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, FlagStore>> {
        self.inner
            .write()
            .map_err(|e| EntitlementError::LockPoisoned(e.to_string()))
    }

    /// Run a read-only closure against the store.
    pub fn read<R>(&self, f: impl FnOnce(&FlagStore) -> R) -> Result<R> {
        let store = self.read_guard()?;
        Ok(f(&store))
    }

    /// Run a mutation under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut FlagStore) -> Result<R>) -> Result<R> {
        let mut store = self.write_guard()?;
        f(&mut store)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<FlagState> {
        self.read(|store| store.state().clone())
    }

    pub fn get(&self, key: &str) -> Result<bool> {
        self.read(|store| store.get(key))?
    }

    pub fn toggle(&self, key: &str) -> Result<bool> {
        self.update(|store| store.toggle(key))
    }

    pub fn set(&self, key: &str, enabled: bool) -> Result<()> {
        self.update(|store| store.set(key, enabled))
    }

    pub fn enable_all(&self) -> Result<()> {
        self.update(|store| {
            store.enable_all();
            Ok(())
        })
    }

    pub fn disable_all(&self) -> Result<()> {
        self.update(|store| {
            store.disable_all();
            Ok(())
        })
    }

    pub fn set_category(&self, category: &str, enabled: bool) -> Result<()> {
        self.update(|store| store.set_category(category, enabled))
    }

    pub fn reset(&self) -> Result<()> {
        self.update(|store| {
            store.reset();
            Ok(())
        })
    }

    pub fn set_tier(&self, tier_id: &str) -> Result<()> {
        self.update(|store| store.set_tier(tier_id))
    }

    /// Move to the next tier; returns the new tier id, `None` at the top.
    pub fn upgrade(&self) -> Result<Option<String>> {
        self.update(|store| Ok(store.upgrade()?.map(|tier| tier.id.clone())))
    }

    pub fn export(&self) -> Result<String> {
        self.read(|store| store.export())?
    }

    /// Parse outside the lock, then swap the state in under it.
    pub fn import(&self, text: &str) -> Result<()> {
        let catalog = self.read(|store| store.catalog_handle())?;
        let state = codec::import(&catalog, text)?;
        self.write_guard()?.replace_state(state);
        Ok(())
    }
}

impl From<FlagStore> for SharedFlagStore {
    fn from(store: FlagStore) -> Self {
        Self::new(store)
    }
}
