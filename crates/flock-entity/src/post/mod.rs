//! Post entity.

pub mod model;
pub mod visibility;

pub use model::{FeedItem, NewPost, Post, PostUpdate};
pub use visibility::Visibility;
