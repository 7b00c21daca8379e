//! Real-time delivery configuration.

use serde::{Deserialize, Serialize};

/// Settings for the presence registry and live push channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffered outbound events per connection before pushes are dropped.
    #[serde(default = "default_channel_buffer_size")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer_size(),
        }
    }
}

fn default_channel_buffer_size() -> usize {
    64
}
