//! Post lifecycle service.

pub mod service;

pub use service::PostService;
