//! Domain limits and attempt thresholds.

use serde::{Deserialize, Serialize};

/// Limits applied to feed pagination, content size, history capacities,
/// and abuse counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Posts returned per feed or listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Maximum post text length in characters.
    #[serde(default = "default_post_text_max")]
    pub post_text_max: usize,
    /// Maximum comment/reply text length in characters.
    #[serde(default = "default_comment_text_max")]
    pub comment_text_max: usize,
    /// Maximum bio text length in characters.
    #[serde(default = "default_bio_text_max")]
    pub bio_text_max: usize,
    /// Maximum media references per post.
    #[serde(default = "default_max_post_media")]
    pub max_post_media: usize,
    /// Search history entries kept per user.
    #[serde(default = "default_search_history_capacity")]
    pub search_history_capacity: i64,
    /// Visitor log entries kept per user.
    #[serde(default = "default_visitor_log_capacity")]
    pub visitor_log_capacity: i64,
    /// Days a notification is retained before the sweep removes it.
    #[serde(default = "default_notification_retention_days")]
    pub notification_retention_days: i64,
    /// Notifications returned per poll.
    #[serde(default = "default_notification_list_limit")]
    pub notification_list_limit: i64,
    /// Posts a user may create per day before spam lockout.
    #[serde(default = "default_post_daily_limit")]
    pub post_daily_limit: i64,
    /// Times per day a user may mention all followers.
    #[serde(default = "default_mention_daily_limit")]
    pub mention_daily_limit: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            post_text_max: default_post_text_max(),
            comment_text_max: default_comment_text_max(),
            bio_text_max: default_bio_text_max(),
            max_post_media: default_max_post_media(),
            search_history_capacity: default_search_history_capacity(),
            visitor_log_capacity: default_visitor_log_capacity(),
            notification_retention_days: default_notification_retention_days(),
            notification_list_limit: default_notification_list_limit(),
            post_daily_limit: default_post_daily_limit(),
            mention_daily_limit: default_mention_daily_limit(),
        }
    }
}

fn default_page_size() -> u64 {
    30
}

fn default_post_text_max() -> usize {
    400
}

fn default_comment_text_max() -> usize {
    120
}

fn default_bio_text_max() -> usize {
    150
}

fn default_max_post_media() -> usize {
    4
}

fn default_search_history_capacity() -> i64 {
    20
}

fn default_visitor_log_capacity() -> i64 {
    30
}

fn default_notification_retention_days() -> i64 {
    7
}

fn default_notification_list_limit() -> i64 {
    50
}

fn default_post_daily_limit() -> i64 {
    50
}

fn default_mention_daily_limit() -> i64 {
    2
}
