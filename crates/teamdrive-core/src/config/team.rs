//! Team directory client configuration.

use serde::{Deserialize, Serialize};

/// Where team membership lookups are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDirectoryConfig {
    /// Base URL of the team service, e.g. `http://teams:3000`.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    5
}
