//! The remote catalog store seam.
//!
//! The catalog service is the sole source of truth for item records and
//! their `order` field. The ordering subsystem reaches it exclusively
//! through the [`CatalogStore`] trait so that production code talks HTTP
//! ([`HttpCatalogStore`]) while tests drive the same algorithms against a
//! deterministic in-memory fake ([`MemoryStore`]).

use std::fmt;

use crate::model::{Item, ItemId, MutationKind, PartitionKey};

mod http;
mod memory;

pub use http::HttpCatalogStore;
pub use memory::MemoryStore;

/// Minimal contract the ordering subsystem needs from the catalog service.
///
/// Implementations may be remote (HTTP) or local (test fake); callers are
/// generic over the store and never observe which one they hold.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    /// Fetch every item across all partitions (reindex input).
    ///
    /// # Errors
    /// Remote call or decode failure.
    async fn fetch_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Fetch the items of one partition, server-filtered by category and
    /// section. Callers still sort client-side; the service does not
    /// guarantee an ordering.
    ///
    /// # Errors
    /// Remote call or decode failure.
    async fn fetch_partition(&self, key: &PartitionKey) -> Result<Vec<Item>, StoreError>;

    /// Rewrite a single item's `order` field, leaving the rest of the
    /// record untouched.
    ///
    /// # Errors
    /// Remote call failure, or [`StoreError::NotFound`] for an unknown id.
    async fn set_order(&self, id: &ItemId, order: i64) -> Result<(), StoreError>;

    /// Apply one mutation (activate / deactivate / delete) to one item.
    ///
    /// # Errors
    /// Remote call failure, or [`StoreError::NotFound`] for an unknown id.
    async fn apply_mutation(&self, id: &ItemId, kind: MutationKind) -> Result<(), StoreError>;
}

/// Error type covering transport, protocol, and lookup failures against the
/// catalog store.
#[derive(Debug)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, body decode).
    Http(reqwest::Error),
    /// The service answered with a non-success status.
    Status {
        /// HTTP status code returned.
        code: u16,
        /// Request URL, for log correlation.
        url: String,
    },
    /// The item id is unknown to the service.
    NotFound {
        /// Identifier that failed to resolve.
        id: ItemId,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "catalog request failed: {err}"),
            Self::Status { code, url } => {
                write!(f, "catalog returned status {code} for {url}")
            }
            Self::NotFound { id } => write!(f, "catalog item {id} not found"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}
