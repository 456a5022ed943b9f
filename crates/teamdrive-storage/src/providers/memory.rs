//! In-memory blob store for tests and local development.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use teamdrive_core::result::AppResult;
use teamdrive_core::traits::blob::{BlobObjectMeta, BlobStore, Disposition};

/// Blob store that keeps object metadata in a concurrent map.
///
/// Presigned URLs use a `memory://` scheme and carry the operation,
/// expiry and disposition as query parameters so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, BlobObjectMeta>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a client upload through a presigned URL.
    pub fn put_object(&self, key: &str, size_bytes: i64, content_type: Option<&str>) {
        self.objects.insert(
            key.to_string(),
            BlobObjectMeta {
                size_bytes,
                content_type: content_type.map(str::to_string),
                last_modified: Some(Utc::now()),
            },
        );
    }

    /// Check whether an object exists.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn presigned_put(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        Ok(format!(
            "memory://{key}?op=put&expires={}",
            expires_in.as_secs()
        ))
    }

    async fn presigned_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: Disposition,
        filename: &str,
    ) -> AppResult<String> {
        let mode = match disposition {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };
        Ok(format!(
            "memory://{key}?op=get&expires={}&disposition={mode}&filename={filename}",
            expires_in.as_secs()
        ))
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<BlobObjectMeta>> {
        Ok(self.objects.get(key).map(|entry| entry.value().clone()))
    }

    async fn remove_objects(&self, keys: &[String]) -> AppResult<()> {
        for key in keys {
            self.objects.remove(key);
        }
        Ok(())
    }
}
