//! Presence registry — the single owner of the online-connection map.
//!
//! All mutation goes through `register`/`unregister`; callers only ever
//! read handles via `lookup`. Disconnect events carry the connection, not
//! the user, so unregistration is keyed by connection id and leaves the
//! entry alone when a newer connection has already replaced it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use flock_core::config::realtime::RealtimeConfig;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe map of user identity to their live connection.
#[derive(Debug)]
pub struct PresenceRegistry {
    /// User ID → current connection handle.
    by_user: DashMap<Uuid, Arc<ConnectionHandle>>,
    /// Connection ID → owning user, for disconnect lookup.
    by_conn: DashMap<ConnectionId, Uuid>,
    /// Outbound buffer per connection.
    buffer_size: usize,
}

impl PresenceRegistry {
    /// Create a new empty registry.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            by_user: DashMap::new(),
            by_conn: DashMap::new(),
            buffer_size: config.channel_buffer_size,
        }
    }

    /// Register a live connection for a user.
    ///
    /// A user holds at most one connection: registering over an existing one
    /// closes and replaces the stale handle, so a reconnect can never leave
    /// the old handle reachable.
    pub fn register(&self, user_id: Uuid) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, tx));

        self.by_conn.insert(handle.id, user_id);
        if let Some(previous) = self.by_user.insert(user_id, Arc::clone(&handle)) {
            previous.mark_dead();
            self.by_conn.remove(&previous.id);
        }

        info!(conn_id = %handle.id, user_id = %user_id, "Connection registered");
        (handle, rx)
    }

    /// Unregister by connection id.
    ///
    /// No-op when the connection is unknown or when the user has already
    /// re-registered with a newer connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some((_, user_id)) = self.by_conn.remove(conn_id) {
            let removed = self
                .by_user
                .remove_if(&user_id, |_, handle| handle.id == *conn_id);
            if let Some((_, handle)) = removed {
                handle.mark_dead();
                info!(conn_id = %conn_id, user_id = %user_id, "Connection unregistered");
            }
        }
    }

    /// Look up the live connection for a user, if any.
    pub fn lookup(&self, user_id: Uuid) -> Option<Arc<ConnectionHandle>> {
        self.by_user.get(&user_id).map(|entry| Arc::clone(&entry))
    }

    /// Check whether a user currently has a live connection.
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.by_user.contains_key(&user_id)
    }

    /// Number of connected users.
    pub fn online_count(&self) -> usize {
        self.by_user.len()
    }
}
