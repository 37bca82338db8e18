//! Deterministic in-memory catalog store for tests and local experiments.
//!
//! Mirrors the remote service's observable behavior closely enough to drive
//! the ordering algorithms end-to-end: items live in a `Mutex`-guarded list,
//! writes can be made to fail per id, and every write attempt is counted so
//! tests can assert that boundary moves and refused swaps issue no calls.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CatalogStore, StoreError};
use crate::model::{Item, ItemId, MutationKind, PartitionKey};

/// In-memory [`CatalogStore`] with scriptable per-id write failures.
#[derive(Default)]
pub struct MemoryStore {
    /// Item records, in insertion order.
    items: Mutex<Vec<Item>>,
    /// Ids whose writes fail with a synthetic 500.
    failing: Mutex<HashSet<ItemId>>,
    /// Count of `set_order` attempts, including failed ones.
    order_writes: AtomicUsize,
    /// Count of `apply_mutation` attempts, including failed ones.
    mutation_calls: AtomicUsize,
}

/// Lock a mutex, recovering the inner data from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Seed the store with an initial item list.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Make every subsequent write for `id` fail with a synthetic 500.
    pub fn fail_writes_for(&self, id: &ItemId) {
        lock(&self.failing).insert(id.clone());
    }

    /// Clone the current item list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Item> {
        lock(&self.items).clone()
    }

    /// Look up a single item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<Item> {
        lock(&self.items).iter().find(|it| it.id == *id).cloned()
    }

    /// Number of `set_order` attempts seen so far.
    #[must_use]
    pub fn order_write_count(&self) -> usize {
        self.order_writes.load(Ordering::SeqCst)
    }

    /// Number of `apply_mutation` attempts seen so far.
    #[must_use]
    pub fn mutation_call_count(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    /// Synthetic failure for an id scripted via [`Self::fail_writes_for`].
    fn injected_failure(id: &ItemId) -> StoreError {
        StoreError::Status {
            code: 500,
            url: format!("memory://items/{id}"),
        }
    }
}

impl CatalogStore for MemoryStore {
    async fn fetch_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.snapshot())
    }

    async fn fetch_partition(&self, key: &PartitionKey) -> Result<Vec<Item>, StoreError> {
        Ok(lock(&self.items)
            .iter()
            .filter(|it| it.partition_key() == *key)
            .cloned()
            .collect())
    }

    async fn set_order(&self, id: &ItemId, order: i64) -> Result<(), StoreError> {
        self.order_writes.fetch_add(1, Ordering::SeqCst);
        if lock(&self.failing).contains(id) {
            return Err(Self::injected_failure(id));
        }
        let mut items = lock(&self.items);
        match items.iter_mut().find(|it| it.id == *id) {
            Some(item) => {
                item.order = order;
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.clone() }),
        }
    }

    async fn apply_mutation(&self, id: &ItemId, kind: MutationKind) -> Result<(), StoreError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if lock(&self.failing).contains(id) {
            return Err(Self::injected_failure(id));
        }
        let mut items = lock(&self.items);
        let Some(pos) = items.iter().position(|it| it.id == *id) else {
            return Err(StoreError::NotFound { id: id.clone() });
        };
        match kind {
            MutationKind::Activate => items[pos].active = true,
            MutationKind::Deactivate => items[pos].active = false,
            MutationKind::Delete => {
                items.remove(pos);
            }
        }
        Ok(())
    }
}
