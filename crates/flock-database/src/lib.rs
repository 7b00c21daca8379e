//! # flock-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all Flock entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
