//! Event publisher configuration.

use serde::{Deserialize, Serialize};

/// Event transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Provider: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Prefix prepended to every channel name.
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
    /// Inbound channel (without prefix) carrying external status changes.
    #[serde(default = "default_status_channel")]
    pub status_channel: String,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis_url: default_redis_url(),
            channel_prefix: default_channel_prefix(),
            status_channel: default_status_channel(),
        }
    }
}

impl EventsConfig {
    /// Full channel name for a routing key.
    pub fn channel(&self, routing_key: &str) -> String {
        format!("{}{}", self.channel_prefix, routing_key)
    }
}

fn default_provider() -> String {
    "redis".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_channel_prefix() -> String {
    "teamdrive:".to_string()
}

fn default_status_channel() -> String {
    "file.status_changed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_prefixing() {
        let cfg = EventsConfig::default();
        assert_eq!(cfg.channel("upload.completed"), "teamdrive:upload.completed");
    }
}
