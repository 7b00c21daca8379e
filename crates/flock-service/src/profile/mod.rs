//! Profile reads, search history, and the visitor log.

pub mod service;

pub use service::{ProfileService, UserProfile, VisitorEntry};
