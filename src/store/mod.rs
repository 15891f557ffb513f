//! Per-session client state: one list slice per resource plus the state of
//! client-side tables.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::domain::resource::ResourceKind;
use crate::table::ClientTableState;

pub mod list;
pub mod params;

pub use list::{ListAction, ListPage, ListSlice, ListState, RequestTicket};
pub use params::{ListParams, ParamMapping};

/// Key of a session's store, kept in the session cookie.
pub type StoreId = Uuid;

/// Stores kept before the least recently used one is dropped.
pub const DEFAULT_STORE_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
pub struct Store {
    lists: HashMap<ResourceKind, ListSlice>,
    tables: HashMap<String, ClientTableState>,
}

impl Store {
    pub fn list(&self, resource: ResourceKind) -> Option<&ListSlice> {
        self.lists.get(&resource)
    }

    pub fn list_mut(&mut self, resource: ResourceKind) -> &mut ListSlice {
        self.lists.entry(resource).or_default()
    }

    pub fn table_state(&self, table_id: &str) -> ClientTableState {
        self.tables.get(table_id).cloned().unwrap_or_default()
    }

    pub fn table_state_mut(&mut self, table_id: &str) -> &mut ClientTableState {
        self.tables.entry(table_id.to_string()).or_default()
    }
}

#[derive(Debug, Default)]
struct Entries {
    stores: HashMap<StoreId, (u64, Store)>,
    clock: u64,
}

/// Shared registry of per-session stores.
///
/// Access goes through [`StoreRegistry::with_store`]; the lock is released
/// when the closure returns, so it can never be held across an `.await`.
#[derive(Debug)]
pub struct StoreRegistry {
    entries: Mutex<Entries>,
    capacity: usize,
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl StoreRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    /// Runs `f` on the store of `id`, creating it on first use.
    pub fn with_store<T>(&self, id: StoreId, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clock += 1;
        let now = entries.clock;

        if !entries.stores.contains_key(&id) && entries.stores.len() >= self.capacity {
            let oldest = entries
                .stores
                .iter()
                .min_by_key(|(_, (used, _))| *used)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                log::debug!("Evicting store {oldest}");
                entries.stores.remove(&oldest);
            }
        }

        let (used, store) = entries.stores.entry(id).or_default();
        *used = now;
        f(store)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stores
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TableQueryState;

    #[test]
    fn stores_are_isolated_per_session() {
        let registry = StoreRegistry::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        registry.with_store(alice, |store| {
            store
                .list_mut(ResourceKind::Products)
                .begin(ListParams::from_state(&TableQueryState::default()));
        });

        let bob_loading = registry.with_store(bob, |store| {
            store
                .list(ResourceKind::Products)
                .is_some_and(|slice| slice.state().is_loading)
        });
        let alice_loading = registry.with_store(alice, |store| {
            store
                .list(ResourceKind::Products)
                .is_some_and(|slice| slice.state().is_loading)
        });

        assert!(!bob_loading);
        assert!(alice_loading);
    }

    #[test]
    fn least_recently_used_store_is_evicted() {
        let registry = StoreRegistry::new(2);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        registry.with_store(first, |store| store.table_state_mut("media").page_index = 3);
        registry.with_store(second, |_| ());
        registry.with_store(first, |_| ());
        registry.with_store(third, |_| ());

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.with_store(first, |store| store.table_state("media").page_index),
            3
        );
    }

    #[test]
    fn table_state_defaults_when_unknown() {
        let store = Store::default();
        assert_eq!(store.table_state("media"), ClientTableState::default());
    }
}
