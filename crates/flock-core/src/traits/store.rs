//! Ephemeral store trait for TTL-backed volatile state.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for ephemeral key/value backends (Redis or in-memory).
///
/// Four primitive families share one keyspace: scalar counters with expiry,
/// ordered lists, membership sets, and field-indexed hashes. Every operation
/// is atomic at the single-key level; nothing here spans keys. Absence of a
/// key is a valid state and reads as empty/zero, never an error.
#[async_trait]
pub trait EphemeralStore: Send + Sync + std::fmt::Debug + 'static {
    // ── Scalars ────────────────────────────────────────────

    /// Get a scalar value. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a scalar value, optionally with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()>;

    /// Delete a key of any family.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Increment an integer value by 1, initializing to 1 if absent.
    /// Returns the new value.
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Set the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    // ── Lists ──────────────────────────────────────────────

    /// Prepend a value to a list, creating it if absent. Returns the new length.
    async fn list_push_front(&self, key: &str, value: &str) -> AppResult<i64>;

    /// Remove and return the last element of a list.
    async fn list_pop_back(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove every occurrence of `value` from a list. Returns the removed count.
    async fn list_remove(&self, key: &str, value: &str) -> AppResult<i64>;

    /// Trim a list to the inclusive index range `[start, stop]`.
    async fn list_trim(&self, key: &str, start: i64, stop: i64) -> AppResult<()>;

    /// Return the elements in the inclusive index range `[start, stop]`.
    /// `-1` addresses the last element.
    async fn list_range(&self, key: &str, start: i64, stop: i64) -> AppResult<Vec<String>>;

    /// Return the length of a list (0 if absent).
    async fn list_len(&self, key: &str) -> AppResult<i64>;

    // ── Sets ───────────────────────────────────────────────

    /// Add a member to a set. Returns `true` if it was not already present.
    async fn set_add(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Remove a member from a set. Returns `true` if it was present.
    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Return all members of a set (empty if absent).
    async fn set_members(&self, key: &str) -> AppResult<Vec<String>>;

    /// Check membership in a set.
    async fn set_contains(&self, key: &str, member: &str) -> AppResult<bool>;

    // ── Hashes ─────────────────────────────────────────────

    /// Set a field in a hash, creating the hash if absent.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()>;

    /// Get multiple fields from a hash. Each position is `None` when the
    /// field (or the hash) is absent.
    async fn hash_get(&self, key: &str, fields: &[String]) -> AppResult<Vec<Option<String>>>;

    /// Remove a field from a hash.
    async fn hash_remove(&self, key: &str, field: &str) -> AppResult<()>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
