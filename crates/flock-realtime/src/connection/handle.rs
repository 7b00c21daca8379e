//! Individual live connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::LiveEvent;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single live connection.
///
/// Holds the bounded sender for pushing events to the client. The receiving
/// half is drained by the external transport.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: Uuid,
    /// Sender for outbound events, serialized as JSON lines.
    sender: mpsc::Sender<String>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(user_id: Uuid, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Push an event to this connection, best-effort.
    ///
    /// Never blocks: a full buffer drops the event, a closed receiver marks
    /// the handle dead. Returns whether the event was accepted.
    pub fn send(&self, event: &LiveEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        let msg = match serde_json::to_string(event) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize live event");
                return false;
            }
        };
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
