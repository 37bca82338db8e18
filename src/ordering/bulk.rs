//! Bulk mutation: apply one mutation to many items, reporting per-id
//! outcomes.

use futures::future::join_all;
use tracing::{info, warn};

use crate::model::{ItemId, MutationKind};
use crate::store::{CatalogStore, StoreError};

/// Per-identifier results of a bulk mutation.
///
/// Every id resolves independently; a batch with failures still records
/// which mutations landed, so callers retry only the failed subset instead
/// of re-issuing mutations that already took effect remotely.
#[derive(Debug)]
pub struct BulkReport {
    /// One entry per requested id, in request order.
    outcomes: Vec<(ItemId, Result<(), StoreError>)>,
}

impl BulkReport {
    /// All outcomes, in request order.
    #[must_use]
    pub fn outcomes(&self) -> &[(ItemId, Result<(), StoreError>)] {
        &self.outcomes
    }

    /// Ids whose mutation was applied.
    #[must_use]
    pub fn succeeded(&self) -> Vec<&ItemId> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.is_ok().then_some(id))
            .collect()
    }

    /// Ids whose mutation failed, with the error.
    #[must_use]
    pub fn failed(&self) -> Vec<(&ItemId, &StoreError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (id, e)))
            .collect()
    }

    /// Whether the whole batch landed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, r)| r.is_ok())
    }

    /// Number of ids in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Apply `kind` to every id concurrently and collect per-id outcomes.
///
/// Each remote call resolves independently; one failure neither cancels nor
/// masks the others. The report's [`BulkReport::all_succeeded`] is the
/// batch-level verdict.
pub async fn apply_bulk<S: CatalogStore>(
    store: &S,
    ids: &[ItemId],
    kind: MutationKind,
) -> BulkReport {
    info!(count = ids.len(), mutation = %kind, "applying bulk mutation");
    let results = join_all(ids.iter().map(|id| store.apply_mutation(id, kind))).await;
    let outcomes: Vec<(ItemId, Result<(), StoreError>)> =
        ids.iter().cloned().zip(results).collect();

    let failures = outcomes.iter().filter(|(_, r)| r.is_err()).count();
    if failures > 0 {
        warn!(
            failures,
            total = outcomes.len(),
            mutation = %kind,
            "bulk mutation partially failed"
        );
    }
    BulkReport { outcomes }
}
