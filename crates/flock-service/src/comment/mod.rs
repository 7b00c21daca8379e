//! Comment and reply service.

pub mod service;

pub use service::CommentService;
