//! # flock-cache
//!
//! Ephemeral store implementations for Flock. Supports two backends:
//!
//! - **memory**: In-process store over [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The backend is selected at runtime based on configuration. Both implement
//! the `EphemeralStore` trait from `flock-core`: scalar counters with TTL,
//! bounded lists, membership sets, and field-indexed hashes.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
