//! Bounded, deduplicated, most-recent-first lists.
//!
//! `RecencyTracker` backs plain recency lists (search history).
//! `VisitorLog` couples a recency list with a visitor → last-visit
//! timestamp map and keeps the two structures in lockstep.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use flock_cache::keys;
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;

/// Maintains capacity-bounded recency lists in the ephemeral store.
#[derive(Debug, Clone)]
pub struct RecencyTracker {
    store: Arc<dyn EphemeralStore>,
}

impl RecencyTracker {
    /// Create a new recency tracker.
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    /// Move `token` to the front of the `(kind, identity)` list, then trim
    /// to `capacity`. A re-touched token moves rather than duplicating.
    pub async fn touch(
        &self,
        kind: &str,
        identity: &str,
        token: &str,
        capacity: i64,
    ) -> AppResult<()> {
        let key = keys::recency(kind, identity);
        self.store.list_remove(&key, token).await?;
        self.store.list_push_front(&key, token).await?;
        self.store.list_trim(&key, 0, capacity - 1).await?;
        Ok(())
    }

    /// Delete `token` from the list regardless of position.
    pub async fn remove(&self, kind: &str, identity: &str, token: &str) -> AppResult<()> {
        let key = keys::recency(kind, identity);
        self.store.list_remove(&key, token).await?;
        Ok(())
    }

    /// The list contents, most recent first, up to `capacity` entries.
    pub async fn list(&self, kind: &str, identity: &str, capacity: i64) -> AppResult<Vec<String>> {
        let key = keys::recency(kind, identity);
        self.store.list_range(&key, 0, capacity - 1).await
    }
}

/// A visitor entry with its last-visit timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// The visiting identity.
    pub visitor: String,
    /// Last visit time in epoch milliseconds.
    pub visited_at: i64,
}

/// Recency list plus a companion visitor → timestamp map.
///
/// Eviction removes by position agreement: the victim is whatever pops off
/// the list's tail, and only that exact token's timestamp field is deleted.
/// The map's key set therefore always equals the list's element set, even
/// when concurrent touches interleave.
#[derive(Debug, Clone)]
pub struct VisitorLog {
    store: Arc<dyn EphemeralStore>,
}

impl VisitorLog {
    /// Create a new visitor log.
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    /// Record a visit: move the visitor to the list front, stamp the
    /// timestamp, then evict overflow from both structures together.
    pub async fn touch(&self, owner: &str, visitor: &str, capacity: i64) -> AppResult<()> {
        let list_key = keys::visitor_list(owner);
        let time_key = keys::visitor_times(owner);
        let now_ms = Utc::now().timestamp_millis();

        self.store.list_remove(&list_key, visitor).await?;
        self.store.list_push_front(&list_key, visitor).await?;
        self.store
            .hash_set(&time_key, visitor, &now_ms.to_string())
            .await?;

        while self.store.list_len(&list_key).await? > capacity {
            match self.store.list_pop_back(&list_key).await? {
                Some(evicted) => {
                    self.store.hash_remove(&time_key, &evicted).await?;
                    debug!(owner, evicted, "Evicted oldest visitor");
                }
                None => break,
            }
        }
        Ok(())
    }

    /// The visitor log in list order (most recent first) with timestamps.
    pub async fn visitors(&self, owner: &str) -> AppResult<Vec<Visit>> {
        let list_key = keys::visitor_list(owner);
        let time_key = keys::visitor_times(owner);

        let visitors = self.store.list_range(&list_key, 0, -1).await?;
        if visitors.is_empty() {
            return Ok(Vec::new());
        }
        let times = self.store.hash_get(&time_key, &visitors).await?;

        Ok(visitors
            .into_iter()
            .zip(times)
            .map(|(visitor, time)| Visit {
                visitor,
                visited_at: time.and_then(|t| t.parse().ok()).unwrap_or(0),
            })
            .collect())
    }
}
