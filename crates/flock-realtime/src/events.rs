//! Live event envelopes pushed to connected receivers.

use serde::{Deserialize, Serialize};

use flock_entity::notification::{NotificationKind, NotificationPayload};

/// An event pushed over a live connection.
///
/// The live copy of a notification mirrors the persisted record minus the
/// receiver set; delivery is best-effort and an offline receiver simply
/// sees the record on their next poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A notification fanned out to this receiver.
    Notification {
        /// What happened.
        kind: NotificationKind,
        /// Human-readable message.
        message: String,
        /// Entity references relevant to the kind.
        payload: NotificationPayload,
    },
}
