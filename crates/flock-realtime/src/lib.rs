//! # flock-realtime
//!
//! In-process presence tracking and best-effort live event delivery.
//!
//! The registry maps a user to their single live connection handle; the
//! transport that feeds bytes in and drains the per-connection receiver is
//! external. Nothing here persists: the registry is rebuilt empty on
//! restart and clients re-register on reconnect.

pub mod connection;
pub mod events;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::PresenceRegistry;
pub use events::LiveEvent;
