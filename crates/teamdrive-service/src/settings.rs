//! Tunables handed to the services.

use std::time::Duration;

use teamdrive_core::config::storage::StorageConfig;

/// Service-level settings derived from [`StorageConfig`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Lifetime of presigned URLs.
    pub presign_expiry: Duration,
    /// Lowercase extensions (without the dot) allowed for inline preview.
    pub preview_extensions: Vec<String>,
    /// Concurrent child queries per tree-walk level.
    pub tree_walk_concurrency: usize,
}

impl ServiceSettings {
    /// Derive settings from the storage configuration section.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            presign_expiry: Duration::from_secs(config.presign_expiry_seconds),
            preview_extensions: config
                .preview_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            tree_walk_concurrency: config.tree_walk_concurrency.max(1),
        }
    }

    /// Check whether an extension may be previewed inline.
    pub fn allows_preview(&self, extension: &str) -> bool {
        self.preview_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}
