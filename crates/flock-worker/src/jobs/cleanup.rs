//! Retention sweep for expired notifications.
//!
//! Notification records expire unconditionally after their retention
//! window, whether or not every receiver acknowledged them. This job is
//! the reaper.

use std::sync::Arc;

use tracing::{error, info};

use flock_core::result::AppResult;
use flock_database::repositories::notification::NotificationRepository;

/// Purges notification records past their retention window.
#[derive(Debug, Clone)]
pub struct NotificationCleanup {
    /// Notification repository.
    repo: Arc<NotificationRepository>,
}

impl NotificationCleanup {
    /// Create a new cleanup job.
    pub fn new(repo: Arc<NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Run one sweep. Returns the purge count.
    pub async fn run(&self) -> AppResult<u64> {
        let purged = self.repo.delete_expired().await?;
        if purged > 0 {
            info!(purged, "Purged expired notifications");
        }
        Ok(purged)
    }

    /// Run one sweep, logging instead of propagating errors. Scheduler
    /// entry point.
    pub async fn run_logged(&self) {
        if let Err(e) = self.run().await {
            error!(error = %e, "Notification cleanup failed");
        }
    }
}
