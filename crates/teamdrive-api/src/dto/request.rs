//! Query strings and webhook payloads not owned by the service layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teamdrive_auth::RequestScope;
use teamdrive_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};

/// `?projectId=&teamId=`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    /// Project the request targets.
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// Team owning the project.
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

impl From<ScopeQuery> for RequestScope {
    fn from(query: ScopeQuery) -> Self {
        RequestScope {
            project_id: query.project_id,
            team_id: query.team_id,
        }
    }
}

/// `?projectId=&teamId=&page=&limit=` for folder browsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderQuery {
    /// Project the request targets.
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// Team owning the project.
    #[serde(default)]
    pub team_id: Option<Uuid>,
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl FolderQuery {
    /// The request scope.
    pub fn scope(&self) -> RequestScope {
        RequestScope {
            project_id: self.project_id,
            team_id: self.team_id,
        }
    }

    /// The requested page, clamped.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// S3 bucket event notification, as sent by MinIO and AWS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageNotification {
    /// One entry per affected object.
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageRecord>,
}

/// One object event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    /// e.g. `s3:ObjectCreated:Put` (MinIO) or `ObjectCreated:Put` (AWS).
    pub event_name: String,
    /// Bucket and object.
    pub s3: StorageRecordEntity,
}

/// The `s3` block of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecordEntity {
    /// The affected object.
    pub object: StorageRecordObject,
}

/// The `s3.object` block of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecordObject {
    /// URL-encoded object key.
    pub key: String,
}

impl StorageRecord {
    /// Whether this record reports a newly written object.
    pub fn is_object_created(&self) -> bool {
        self.event_name
            .trim_start_matches("s3:")
            .starts_with("ObjectCreated:")
    }

    /// The decoded object key. S3 encodes spaces as `+`.
    pub fn decoded_key(&self) -> Option<String> {
        let key = self.s3.object.key.replace('+', " ");
        urlencoding::decode(&key).ok().map(|k| k.into_owned())
    }
}
