//! S3-compatible blob store (AWS S3, MinIO).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use tracing::{debug, info, warn};

use teamdrive_core::config::storage::S3StorageConfig;
use teamdrive_core::error::{AppError, ErrorKind};
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::blob::{BlobObjectMeta, BlobStore, Disposition};

/// S3 `DeleteObjects` accepts at most this many keys per request.
const DELETE_BATCH_SIZE: usize = 1000;

/// Blob store backed by an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from configuration.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "teamdrive-config",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    fn presigning(expires_in: Duration) -> AppResult<PresigningConfig> {
        PresigningConfig::expires_in(expires_in).map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Invalid presign expiry", e)
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "S3 health check failed");
                Ok(false)
            }
        }
    }

    async fn presigned_put(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(Self::presigning(expires_in)?)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to presign upload", e)
            })?;
        Ok(request.uri().to_string())
    }

    async fn presigned_get(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: Disposition,
        filename: &str,
    ) -> AppResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(disposition.header_value(filename))
            .presigned(Self::presigning(expires_in)?)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to presign download", e)
            })?;
        Ok(request.uri().to_string())
    }

    async fn stat_object(&self, key: &str) -> AppResult<Option<BlobObjectMeta>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(head) => Ok(Some(BlobObjectMeta {
                size_bytes: head.content_length().unwrap_or(0),
                content_type: head.content_type().map(str::to_string),
                last_modified: head.last_modified().and_then(|t| {
                    chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())
                }),
            })),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat object '{key}'"),
                e,
            )),
        }
    }

    async fn remove_objects(&self, keys: &[String]) -> AppResult<()> {
        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Invalid object identifier", e)
                })?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Invalid delete request", e)
                })?;

            let output = self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to remove objects", e)
                })?;

            if let Some(err) = output.errors().first() {
                return Err(AppError::storage(format!(
                    "Failed to remove object '{}': {}",
                    err.key().unwrap_or_default(),
                    err.message().unwrap_or_default()
                )));
            }
            debug!(count = batch.len(), "Removed object batch");
        }
        Ok(())
    }
}
