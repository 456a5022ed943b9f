//! Typed request bodies for the file and folder operations.
//!
//! Every service method calls `validate()` before doing anything else so
//! the HTTP adapter and in-process callers get the same checks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use teamdrive_auth::RequestScope;
use teamdrive_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use teamdrive_entity::{NodeStatus, Visibility};

/// Maximum length of a node name.
pub const MAX_NAME_LENGTH: u64 = 255;

/// Maximum number of ids accepted by a single bulk request.
pub const MAX_BULK_IDS: u64 = 1000;

/// Reject names that would break zip paths or look like path traversal.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ValidationError::new("path")
            .with_message("must not contain path separators".into()));
    }
    Ok(())
}

/// Nodes move PENDING to UPLOADED once and never back.
fn validate_status(status: &NodeStatus) -> Result<(), ValidationError> {
    if *status == NodeStatus::Pending {
        return Err(ValidationError::new("status")
            .with_message("cannot be set back to PENDING".into()));
    }
    Ok(())
}

/// Start a fresh two-phase upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BeginUploadRequest {
    /// Display name of the file.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub original_name: String,
    /// Folder to upload into; root when absent.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Replace the bytes of an existing file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BeginUpdateRequest {
    /// Name the file takes once the new bytes are confirmed.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub new_name: String,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Create a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub name: String,
    /// Containing folder; root when absent.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Visibility, `PRIVATE` when absent.
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Allow-list for `SPECIFIC` visibility.
    #[serde(default)]
    pub allowed_user_ids: Option<Vec<Uuid>>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Patch a single node. Only the node itself changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeRequest {
    /// New name.
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub name: Option<String>,
    /// New visibility.
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// New allow-list.
    #[serde(default)]
    pub allowed_user_ids: Option<Vec<Uuid>>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Patch many nodes at once, optionally moving them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    /// Target node ids.
    #[validate(length(min = 1, max = MAX_BULK_IDS))]
    pub ids: Vec<Uuid>,
    /// New name.
    #[serde(default)]
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_name"))]
    pub name: Option<String>,
    /// New status. Only applied to files.
    #[serde(default)]
    #[validate(custom(function = "validate_status"))]
    pub status: Option<NodeStatus>,
    /// Destination folder.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// New visibility.
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// New allow-list.
    #[serde(default)]
    pub allowed_user_ids: Option<Vec<Uuid>>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Permanently delete nodes and everything beneath them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    /// Root node ids.
    #[validate(length(min = 1, max = MAX_BULK_IDS))]
    pub ids: Vec<Uuid>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Fetch several nodes by id.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    /// Node ids.
    #[validate(length(min = 1, max = MAX_BULK_IDS))]
    pub ids: Vec<Uuid>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Download one file, or a zip of several nodes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Node ids.
    #[validate(length(min = 1, max = MAX_BULK_IDS))]
    pub ids: Vec<Uuid>,
    /// Project and team.
    #[serde(flatten)]
    pub scope: RequestScope,
}

/// Query string of a listing. Fields are flat so they parse from a URL.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesRequest {
    /// Folder to list; root when absent.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Project to list.
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// Team owning the project.
    #[serde(default)]
    pub team_id: Option<Uuid>,
    /// Page number, 1-based.
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
}

impl ListFilesRequest {
    /// The request's scope.
    pub fn scope(&self) -> RequestScope {
        RequestScope {
            project_id: self.project_id,
            team_id: self.team_id,
        }
    }

    /// The request's page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

impl Default for ListFilesRequest {
    fn default() -> Self {
        Self {
            parent_id: None,
            project_id: None,
            team_id: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}
