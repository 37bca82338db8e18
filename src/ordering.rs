//! Category-scoped ordinal reordering: the core of the crate.
//!
//! Catalog entries belong to independent partitions (a category, or a
//! category+section pair) and carry an integer `order` that defines their
//! display sequence within the partition. This module maintains that
//! sequence:
//! - [`sorted_partition`] reads a partition in display order from a
//!   caller-held snapshot.
//! - [`swap`] moves one entry a single position by exchanging `order`
//!   values with its neighbor, then re-reads the partition after a settle
//!   delay.
//! - [`reindex`] repairs drifted partitions (duplicate or missing `order`
//!   values) back to a dense `1..N` sequence using creation time as ground
//!   truth.
//! - [`apply_bulk`] applies one mutation to many items concurrently and
//!   reports a per-identifier outcome.
//!
//! The subsystem holds no cache: every operation works from the snapshot
//! its caller passes in and writes through the [`crate::store::CatalogStore`]
//! seam. Nothing here prevents two operations racing against the same
//! partition; the repair path is the safety net for the inconsistencies
//! that can produce.

mod accessor;
mod bulk;
mod reindex;
mod swap;

#[cfg(test)]
mod tests;

pub use accessor::{has_duplicate_orders, next_order, sorted_partition};
pub use bulk::{BulkReport, apply_bulk};
pub use reindex::{ReindexError, ReindexReport, reindex, reindex_partition, reindex_plan};
pub use swap::{SwapError, SwapOutcome, swap};
