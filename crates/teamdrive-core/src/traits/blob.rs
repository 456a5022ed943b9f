//! Blob store trait.
//!
//! The service never moves file bytes itself. It only asks the blob store
//! for presigned URLs, object metadata and deletions.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlobObjectMeta {
    /// Size in bytes.
    pub size_bytes: i64,
    /// Content type reported by the store (if known).
    pub content_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// How a presigned download should be presented by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Render in place (preview).
    Inline,
    /// Save as a file (download).
    Attachment,
}

impl Disposition {
    /// Build a `Content-Disposition` header value for `filename`.
    pub fn header_value(&self, filename: &str) -> String {
        let kind = match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        };
        let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{kind}; filename=\"{escaped}\"")
    }
}

/// Trait for S3-compatible blob backends.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Issue a presigned PUT URL for `key`.
    async fn presigned_put(&self, key: &str, expires_in: Duration) -> AppResult<String>;

    /// Issue a presigned GET URL for `key` with a forced content disposition.
    async fn presigned_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: Disposition,
        filename: &str,
    ) -> AppResult<String>;

    /// Fetch object metadata. `Ok(None)` when the object does not exist.
    async fn stat_object(&self, key: &str) -> AppResult<Option<BlobObjectMeta>>;

    /// Remove every listed object. Missing objects are not an error.
    async fn remove_objects(&self, keys: &[String]) -> AppResult<()>;
}
