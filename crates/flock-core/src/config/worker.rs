//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Settings for the cron-driven maintenance worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cron expression for the notification retention sweep.
    #[serde(default = "default_notification_cleanup_schedule")]
    pub notification_cleanup_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            notification_cleanup_schedule: default_notification_cleanup_schedule(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_notification_cleanup_schedule() -> String {
    // sec min hour day month weekday
    "0 0 2 * * *".to_string()
}
