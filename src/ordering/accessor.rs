//! Pure reads over caller-held item snapshots.
//!
//! No function here performs IO; callers are responsible for holding a
//! reasonably fresh snapshot (typically the last `fetch_items` or
//! `fetch_partition` result).

use crate::model::{Item, PartitionKey};

/// Return the snapshot's items belonging to `key`, sorted ascending by
/// `order`.
///
/// The sort is stable, so equal `order` values (a corruption symptom) keep
/// their snapshot iteration order. That tie-break is arbitrary but
/// deterministic; repair restores distinct values.
#[must_use]
pub fn sorted_partition(snapshot: &[Item], key: &PartitionKey) -> Vec<Item> {
    let mut items: Vec<Item> = snapshot
        .iter()
        .filter(|it| it.partition_key() == *key)
        .cloned()
        .collect();
    items.sort_by_key(|it| it.order);
    items
}

/// Whether any two items in the list share an `order` value.
///
/// Used as the cheap corruption probe after a swap's refetch.
#[must_use]
pub fn has_duplicate_orders(partition_items: &[Item]) -> bool {
    let mut orders: Vec<i64> = partition_items.iter().map(|it| it.order).collect();
    orders.sort_unstable();
    orders.windows(2).any(|w| w[0] == w[1])
}

/// The `order` value that appends a new item to the end of a partition.
///
/// Max existing order plus one; `1` for an empty partition.
#[must_use]
pub fn next_order(snapshot: &[Item], key: &PartitionKey) -> i64 {
    snapshot
        .iter()
        .filter(|it| it.partition_key() == *key)
        .map(|it| it.order)
        .max()
        .map_or(1, |m| m.saturating_add(1))
}
