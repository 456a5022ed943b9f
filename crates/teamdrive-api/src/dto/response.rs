//! Response bodies produced only by the HTTP layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Blob store provider and whether it answered.
    pub storage: StorageHealth,
}

/// Blob store health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageHealth {
    /// Provider name.
    pub provider: String,
    /// Whether the provider answered.
    pub healthy: bool,
}

/// Body returned by the delete routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    /// Every removed node id, descendants included.
    pub deleted_ids: Vec<Uuid>,
}

/// Body returned by the storage webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Records that finalized an upload.
    pub processed: usize,
    /// Records ignored (other event types, unknown keys).
    pub skipped: usize,
}
