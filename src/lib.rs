//! ordina — typed async client for category-scoped catalog ordering.
//!
//! Admin tooling for a device-resale catalog keeps accessories and
//! sell-questions in per-partition display order, scoped by a category or
//! a category+section pair. This crate implements the ordering subsystem
//! behind those screens: reading a partition in display order, moving an
//! entry one position via a pairwise `order` swap, repairing drifted
//! partitions back to a dense `1..N` sequence, and applying bulk
//! activate/deactivate/delete mutations with per-identifier outcomes.
//!
//! The remote catalog REST service is the sole source of truth; all access
//! goes through the [`store::CatalogStore`] seam so tests can substitute an
//! in-memory fake for the HTTP client.

pub mod config;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod store;
pub mod util;
