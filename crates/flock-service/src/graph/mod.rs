//! Social graph mutation service.

pub mod service;

pub use service::SocialGraphService;
