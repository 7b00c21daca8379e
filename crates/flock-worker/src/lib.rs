//! # flock-worker
//!
//! Periodic maintenance tasks for Flock, driven by a cron scheduler.

pub mod jobs;
pub mod scheduler;

pub use scheduler::CronScheduler;
