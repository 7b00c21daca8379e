//! Key builders for all Flock ephemeral-store entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Backend-level prefixing
//! (e.g. `flock:`) is applied by the store, not here.

use uuid::Uuid;

// ── Attempt counters ───────────────────────────────────────

/// Counter key for a rate-limited action by one identity.
pub fn attempts(action: &str, identity: &str) -> String {
    format!("attempts:{action}:{identity}")
}

// ── Recency lists ──────────────────────────────────────────

/// Recency list for a given kind and identity.
pub fn recency(kind: &str, identity: &str) -> String {
    format!("recent:{kind}:{identity}")
}

// ── View tracking ──────────────────────────────────────────

/// Set of post ids a viewer has already been shown.
pub fn view_history(viewer_id: Uuid) -> String {
    format!("history:{viewer_id}")
}

/// Set of viewer ids that have seen a post; the inverse of
/// [`view_history`], kept for cascade cleanup on post deletion.
pub fn post_viewers(post_id: Uuid) -> String {
    format!("viewers:{post_id}")
}

// ── Visitor log ────────────────────────────────────────────

/// Ordered list of recent profile visitors for a user.
pub fn visitor_list(username: &str) -> String {
    format!("visitors:list:{username}")
}

/// Hash of visitor → last-visit timestamp for a user.
pub fn visitor_times(username: &str) -> String {
    format!("visitors:time:{username}")
}
