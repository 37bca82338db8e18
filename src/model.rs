//! Catalog data model shared across the ordering subsystem.
//!
//! This module defines the serializable records exchanged with the remote
//! catalog service: item identifiers, the partition key that scopes every
//! ordering decision, and the item record itself. Only the fields the
//! ordering subsystem reads or writes are modeled; the rest of the item
//! payload (pricing deltas, icons, form labels) stays on the server.

use std::fmt;

/// Opaque unique item identifier assigned by the catalog service.
///
/// Immutable for the lifetime of the item; the client never fabricates one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Build an id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category identifier; every catalog item belongs to exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Build a category id from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sell-question section label (e.g. a device-condition group).
///
/// Accessories carry no section; the catalog service owns the vocabulary, so
/// this is an open newtype rather than a closed enum. Structural equality is
/// all the ordering logic needs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Section(pub String);

impl Section {
    /// Build a section label from anything string-like.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The scope within which `order` values are meaningful.
///
/// Items compare and reorder only against items sharing the same key.
/// Accessories partition by category alone; sell-questions partition by
/// category plus section. One key type covers both shapes so the swap and
/// reindex algorithms exist exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    /// Owning category.
    pub category: CategoryId,
    /// Section within the category, when the item kind has one.
    pub section: Option<Section>,
}

impl PartitionKey {
    /// Key for a category-only partition (accessories).
    #[must_use]
    pub const fn category(category: CategoryId) -> Self {
        Self {
            category,
            section: None,
        }
    }

    /// Key for a category+section partition (sell-questions).
    #[must_use]
    pub const fn sectioned(category: CategoryId, section: Section) -> Self {
        Self {
            category,
            section: Some(section),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{}/{}", self.category, section),
            None => f.write_str(&self.category.0),
        }
    }
}

/// A catalog entry as the ordering subsystem sees it.
///
/// `order` is a signed integer with no meaning outside the item's partition;
/// `created_at` (epoch milliseconds) is the repair tie-break and is never
/// written by this client. Wire format follows the catalog API's camelCase
/// JSON.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier.
    pub id: ItemId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Section label for sell-questions; absent for accessories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    /// Display position within the partition (ascending).
    pub order: i64,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Human-readable title shown in admin lists.
    pub title: String,
    /// Whether the entry is currently offered to customers.
    pub active: bool,
}

impl Item {
    /// The partition this item orders within.
    #[must_use]
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            category: self.category_id.clone(),
            section: self.section.clone(),
        }
    }
}

/// Mutation applied by the bulk operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// Mark the item as offered.
    Activate,
    /// Withdraw the item without deleting it.
    Deactivate,
    /// Remove the item permanently.
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Delete => "delete",
        })
    }
}

/// Direction of a one-position move within a partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward the front of the list (smaller `order`).
    Up,
    /// Toward the back of the list (larger `order`).
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}
