//! # flock-service
//!
//! Business logic for Flock. Services compose the durable repositories,
//! the ephemeral store, and the presence registry; every feature-level
//! operation (follow, post, comment, view) runs through here.

pub mod comment;
pub mod context;
pub mod feed;
pub mod graph;
pub mod limiter;
pub mod notification;
pub mod post;
pub mod profile;
pub mod recency;
mod text;

pub use context::RequestContext;
