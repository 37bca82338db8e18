//! Pairwise swap: move one item a single position within its partition.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::accessor::{has_duplicate_orders, sorted_partition};
use super::reindex::reindex_partition;
use crate::config::Settings;
use crate::model::{Direction, Item, ItemId};
use crate::store::{CatalogStore, StoreError};

/// What a swap invocation did.
#[derive(Debug)]
pub enum SwapOutcome {
    /// The item was already at the partition edge; nothing was written.
    Boundary,
    /// The would-be neighbor belongs to a different partition (stale view);
    /// the move was refused and nothing was written.
    Refused,
    /// Both order writes landed and the partition was re-read.
    Applied {
        /// The partition in display order after the settle delay.
        items: Vec<Item>,
        /// The refreshed partition still shows duplicate `order` values.
        needs_repair: bool,
        /// An automatic partition reindex ran after the swap.
        repaired: bool,
    },
}

/// Swap failure modes.
#[derive(Debug)]
pub enum SwapError {
    /// The id is not present in the caller's view.
    UnknownItem {
        /// Identifier that failed to resolve.
        id: ItemId,
    },
    /// A remote call failed before any order was changed, or during the
    /// refetch.
    Store(StoreError),
    /// The first order write landed but the second failed, leaving the
    /// partition with only one of the two values changed.
    Torn {
        /// Item whose order was already rewritten.
        moved: ItemId,
        /// Neighbor whose order write failed.
        neighbor: ItemId,
        /// The failing write's error.
        source: StoreError,
    },
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem { id } => write!(f, "item {id} is not in the current view"),
            Self::Store(err) => write!(f, "swap aborted: {err}"),
            Self::Torn {
                moved,
                neighbor,
                source,
            } => write!(
                f,
                "torn swap: {moved} was rewritten but updating {neighbor} failed: {source}"
            ),
        }
    }
}

impl std::error::Error for SwapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) | Self::Torn { source: err, .. } => Some(err),
            Self::UnknownItem { .. } => None,
        }
    }
}

impl From<StoreError> for SwapError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Move `id` one position up or down within its partition.
///
/// `view` is the partition as the caller currently displays it, in
/// practice the last [`sorted_partition`] result. The neighbor is resolved
/// from that view, so a stale view can nominate a neighbor that has since
/// moved to another partition; the partition-legality check refuses such
/// moves instead of crossing the boundary.
///
/// The two order writes are independent calls with no transaction around
/// them. After both land, the partition is re-read following the configured
/// settle delay, and duplicate `order` values in the result mark the
/// partition for repair (run automatically when `settings.auto_repair` is
/// set).
///
/// # Errors
/// - [`SwapError::UnknownItem`] when `id` is not in `view`.
/// - [`SwapError::Store`] when the first write or the refetch fails.
/// - [`SwapError::Torn`] when the second write fails after the first
///   succeeded; no rollback is attempted.
pub async fn swap<S: CatalogStore>(
    store: &S,
    settings: &Settings,
    view: &[Item],
    id: &ItemId,
    direction: Direction,
) -> Result<SwapOutcome, SwapError> {
    let Some(idx) = view.iter().position(|it| it.id == *id) else {
        return Err(SwapError::UnknownItem { id: id.clone() });
    };
    let moved = &view[idx];
    let key = moved.partition_key();

    let neighbor_idx = match direction {
        Direction::Up => {
            let Some(i) = idx.checked_sub(1) else {
                debug!(item = %id, partition = %key, "already first; move up ignored");
                return Ok(SwapOutcome::Boundary);
            };
            i
        }
        Direction::Down => {
            if idx + 1 >= view.len() {
                debug!(item = %id, partition = %key, "already last; move down ignored");
                return Ok(SwapOutcome::Boundary);
            }
            idx + 1
        }
    };
    let neighbor = &view[neighbor_idx];

    if neighbor.partition_key() != key {
        warn!(
            item = %id,
            neighbor = %neighbor.id,
            partition = %key,
            neighbor_partition = %neighbor.partition_key(),
            "refusing swap across partition boundary"
        );
        return Ok(SwapOutcome::Refused);
    }

    info!(
        item = %id,
        neighbor = %neighbor.id,
        direction = %direction,
        partition = %key,
        "swapping order values"
    );
    store.set_order(&moved.id, neighbor.order).await?;
    store
        .set_order(&neighbor.id, moved.order)
        .await
        .map_err(|source| SwapError::Torn {
            moved: moved.id.clone(),
            neighbor: neighbor.id.clone(),
            source,
        })?;

    // The service is eventually consistent; give it a moment before trusting
    // a re-read.
    tokio::time::sleep(Duration::from_millis(settings.settle_delay_ms)).await;

    let fetched = store.fetch_partition(&key).await?;
    let mut items = sorted_partition(&fetched, &key);
    let mut needs_repair = has_duplicate_orders(&items);
    let mut repaired = false;

    if needs_repair && settings.auto_repair {
        warn!(partition = %key, "duplicate order values after swap; reindexing partition");
        match reindex_partition(store, &fetched, &key).await {
            Ok(report) => {
                repaired = true;
                let refreshed = store.fetch_partition(&key).await?;
                items = sorted_partition(&refreshed, &key);
                needs_repair = has_duplicate_orders(&items);
                debug!(partition = %key, updated = report.updated, "automatic repair applied");
            }
            Err(e) => {
                warn!(partition = %key, error = %e, "automatic repair failed");
            }
        }
    }

    Ok(SwapOutcome::Applied {
        items,
        needs_repair,
        repaired,
    })
}
