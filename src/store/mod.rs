//! Store Module
//!
//! Capability contract for the backing store, plus the in-memory
//! implementation and the connector that hands out store handles.
//!
//! ## Responsibilities
//! - Raw record blobs: get/set/delete/multi-get keyed by string
//! - Ordered sets: score-ranked member collections for every index
//! - Atomic set-if-absent, used to claim unique-index keys
//!
//! The engine issues several independent store calls per logical write; the
//! contract below is deliberately small so any store with these primitives
//! (an in-process map, Redis, ...) can back a repository.

mod connector;
mod memory;

pub use connector::{Connector, MemoryConnector};
pub use memory::MemoryStore;

use bytes::Bytes;

use crate::error::Result;

/// Backing-store capability contract.
///
/// Implementations must be thread-safe; a single handle is shared across all
/// repository callers. Each method is expected to be atomic on its own and to
/// fail fast -- errors are propagated verbatim, never retried here.
pub trait Store: Send + Sync {
    // -------------------------------------------------------------------------
    // Raw Records
    // -------------------------------------------------------------------------

    /// Get a value by key; `None` when absent
    fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Set a key to a value, overwriting any previous value
    fn set(&self, key: &str, value: Bytes) -> Result<()>;

    /// Set a key only if it is currently absent.
    ///
    /// Returns `true` when the write happened. This is the atomic claim
    /// primitive for unique-index keys: check and set must not be separable.
    fn set_nx(&self, key: &str, value: Bytes) -> Result<bool>;

    /// Delete a key; deleting an absent key is a no-op
    fn delete(&self, key: &str) -> Result<()>;

    /// Get many values in one call, preserving order; absent keys yield `None`
    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<Bytes>>>;

    // -------------------------------------------------------------------------
    // Ordered Sets
    // -------------------------------------------------------------------------

    /// Add a member with a score, replacing the member's previous score
    fn ordered_add(&self, set: &str, score: f64, member: &str) -> Result<()>;

    /// Remove a member; removing an absent member is a no-op
    fn ordered_remove(&self, set: &str, member: &str) -> Result<()>;

    /// Number of members in the set (0 for an absent set)
    fn cardinality(&self, set: &str) -> Result<u64>;

    /// Members at ranks `[start, end]` (inclusive, 0-based) in score order.
    ///
    /// With `reverse`, ranks count from the highest score and members come
    /// back highest-first.
    fn range_by_rank(&self, set: &str, start: usize, end: usize, reverse: bool)
        -> Result<Vec<String>>;

    /// Members with scores in `[min, max]` (inclusive), skipping `offset`
    /// matches and returning at most `limit`, lowest score first (or highest
    /// first with `reverse`)
    fn range_by_score(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: usize,
        limit: usize,
        reverse: bool,
    ) -> Result<Vec<String>>;

    /// Number of members with scores in `[min, max]` (inclusive)
    fn count_by_score(&self, set: &str, min: f64, max: f64) -> Result<u64>;
}
