//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Lifetime of presigned upload and download URLs, in seconds.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_seconds: u64,
    /// Extensions (without the dot) that may be previewed inline.
    #[serde(default = "default_preview_extensions")]
    pub preview_extensions: Vec<String>,
    /// Maximum concurrent child queries per tree-walk level.
    #[serde(default = "default_tree_walk_concurrency")]
    pub tree_walk_concurrency: usize,
    /// S3-compatible object storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            presign_expiry_seconds: default_presign_expiry(),
            preview_extensions: default_preview_extensions(),
            tree_walk_concurrency: default_tree_walk_concurrency(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by MinIO).
    #[serde(default = "default_force_path_style")]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: default_bucket(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: default_force_path_style(),
        }
    }
}

fn default_presign_expiry() -> u64 {
    300
}

fn default_preview_extensions() -> Vec<String> {
    ["pdf", "txt", "jpg", "jpeg", "png", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_tree_walk_concurrency() -> usize {
    16
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "teamdrive".to_string()
}

fn default_force_path_style() -> bool {
    true
}
