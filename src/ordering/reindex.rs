//! Reindex repair: rewrite every partition back to a dense `1..N` sequence.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{error, info};

use crate::model::{Item, ItemId, PartitionKey};
use crate::store::{CatalogStore, StoreError};

/// Summary of an applied reindex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReindexReport {
    /// Distinct partitions covered by the plan.
    pub partitions: usize,
    /// Order writes that were applied.
    pub updated: usize,
}

/// A reindex stopped mid-sequence on a failed write.
///
/// Writes before `updated` are already applied and are not rolled back;
/// re-running the repair is the recovery path.
#[derive(Debug)]
pub struct ReindexError {
    /// Item whose write failed.
    pub id: ItemId,
    /// Writes applied before the failure.
    pub updated: usize,
    /// The failing write's error.
    pub source: StoreError,
}

impl fmt::Display for ReindexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reindex stopped after {} writes: updating {} failed: {}",
            self.updated, self.id, self.source
        )
    }
}

impl std::error::Error for ReindexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Compute the dense-order plan for every partition in the snapshot.
///
/// Items group by [`PartitionKey`]; within each group they sort by
/// `created_at` ascending (deliberately not by the possibly-corrupted
/// `order` field) and receive `order = 1..N` in that sequence. Group
/// iteration follows the key ordering, so identical snapshots produce
/// identical write sequences.
///
/// The plan is a first-class value: callers can show it to an operator
/// before applying, since repair discards any manual ordering that is not
/// reflected in creation order.
#[must_use]
pub fn reindex_plan(snapshot: &[Item]) -> Vec<(ItemId, i64)> {
    let mut groups: BTreeMap<PartitionKey, Vec<&Item>> = BTreeMap::new();
    for item in snapshot {
        groups.entry(item.partition_key()).or_default().push(item);
    }
    let mut plan = Vec::with_capacity(snapshot.len());
    for group in groups.values_mut() {
        group.sort_by_key(|it| it.created_at);
        for (order, item) in (1_i64..).zip(group.iter()) {
            plan.push((item.id.clone(), order));
        }
    }
    plan
}

/// Apply [`reindex_plan`] over the snapshot, one sequential write per item.
///
/// Stops at the first failed write and reports it; earlier writes stay
/// applied. Every item in the plan is written, including items whose order
/// already matches, so a successful run always leaves the service agreeing
/// with the plan regardless of what raced in between reads.
///
/// # Errors
/// [`ReindexError`] carrying the failing id and the number of writes that
/// already landed.
pub async fn reindex<S: CatalogStore>(
    store: &S,
    snapshot: &[Item],
) -> Result<ReindexReport, ReindexError> {
    let partitions = snapshot
        .iter()
        .map(Item::partition_key)
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let plan = reindex_plan(snapshot);
    info!(partitions, items = plan.len(), "applying reindex plan");

    let mut updated = 0_usize;
    for (id, order) in plan {
        match store.set_order(&id, order).await {
            Ok(()) => updated += 1,
            Err(source) => {
                error!(item = %id, error = %source, updated, "reindex write failed; stopping");
                return Err(ReindexError {
                    id,
                    updated,
                    source,
                });
            }
        }
    }

    info!(partitions, updated, "reindex complete");
    Ok(ReindexReport {
        partitions,
        updated,
    })
}

/// Reindex a single partition out of the snapshot.
///
/// Used by the automatic post-swap repair path; identical semantics to
/// [`reindex`] restricted to `key`.
///
/// # Errors
/// See [`reindex`].
pub async fn reindex_partition<S: CatalogStore>(
    store: &S,
    snapshot: &[Item],
    key: &PartitionKey,
) -> Result<ReindexReport, ReindexError> {
    let scoped: Vec<Item> = snapshot
        .iter()
        .filter(|it| it.partition_key() == *key)
        .cloned()
        .collect();
    reindex(store, &scoped).await
}
