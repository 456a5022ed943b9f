//! Preview and download URLs.
//!
//! A single file downloads through a presigned GET. Folders and multi-node
//! selections produce a zip plan that the transport layer streams.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::blob::{BlobStore, Disposition};

use super::requests::DownloadRequest;
use crate::context::RequestContext;
use crate::settings::ServiceSettings;
use crate::tree::{TreeWalker, ZipEntry};

/// Archive name used when the selection is not a single folder.
const DEFAULT_ARCHIVE_NAME: &str = "download.zip";

/// A time-limited URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrl {
    /// The URL.
    pub url: String,
    /// Lifetime of `url`.
    pub expires_in_seconds: u64,
}

/// Files to stream into one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipPlan {
    /// Suggested archive file name.
    pub archive_name: String,
    /// Entries sorted by path.
    pub entries: Vec<ZipEntry>,
}

/// What a download request resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DownloadPlan {
    /// Single file: redirect to a presigned GET.
    Redirect(PresignedUrl),
    /// Folder or several nodes: stream a zip.
    Zip(ZipPlan),
}

/// Issues preview and download URLs.
#[derive(Clone)]
pub struct DownloadService {
    blobs: Arc<dyn BlobStore>,
    resolver: Arc<PermissionResolver>,
    walker: TreeWalker,
    settings: ServiceSettings,
}

impl std::fmt::Debug for DownloadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadService").finish()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<PermissionResolver>,
        walker: TreeWalker,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            blobs,
            resolver,
            walker,
            settings,
        }
    }

    /// Presigned inline URL for a previewable file.
    pub async fn get_preview_url(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        scope: RequestScope,
    ) -> AppResult<PresignedUrl> {
        scope.require_complete()?;
        let node = self.resolver.resolve(id, ctx.user_id, &scope).await?.node;
        if !node.is_file() {
            return Err(AppError::bad_request(format!("Node {id} is not a file")));
        }
        let extension = node.extension().unwrap_or_default();
        if !self.settings.allows_preview(&extension) {
            return Err(AppError::bad_request(format!(
                "Preview is not supported for '{}'",
                node.original_name
            )));
        }
        let storage_key = node
            .storage_key
            .as_deref()
            .ok_or_else(|| AppError::internal(format!("File {id} has no storage key")))?;
        if self.blobs.stat_object(storage_key).await?.is_none() {
            return Err(AppError::not_found(format!("Content of file {id} not found")));
        }

        let url = self
            .blobs
            .presigned_get(
                storage_key,
                self.settings.presign_expiry,
                Disposition::Inline,
                &node.original_name,
            )
            .await?;
        Ok(PresignedUrl {
            url,
            expires_in_seconds: self.settings.presign_expiry.as_secs(),
        })
    }

    /// A redirect for one file, or a zip plan for anything else.
    pub async fn get_download_url(
        &self,
        ctx: &RequestContext,
        req: DownloadRequest,
    ) -> AppResult<DownloadPlan> {
        req.validate()?;
        req.scope.require_complete()?;
        let role = self.resolver.resolve_role(ctx.user_id, &req.scope).await?;

        let mut seen = HashSet::new();
        let mut roots = Vec::with_capacity(req.ids.len());
        for id in req.ids {
            if seen.insert(id) {
                let resolved = self
                    .resolver
                    .resolve_with_role(id, ctx.user_id, &req.scope, role)
                    .await?;
                roots.push(resolved.node);
            }
        }

        if let [node] = roots.as_slice() {
            if node.is_file() {
                let storage_key = node.storage_key.as_deref().ok_or_else(|| {
                    AppError::internal(format!("File {} has no storage key", node.id))
                })?;
                let url = self
                    .blobs
                    .presigned_get(
                        storage_key,
                        self.settings.presign_expiry,
                        Disposition::Attachment,
                        &node.original_name,
                    )
                    .await?;
                return Ok(DownloadPlan::Redirect(PresignedUrl {
                    url,
                    expires_in_seconds: self.settings.presign_expiry.as_secs(),
                }));
            }
        }

        let archive_name = match roots.as_slice() {
            [folder] if folder.is_folder() => format!("{}.zip", folder.original_name),
            _ => DEFAULT_ARCHIVE_NAME.to_string(),
        };
        let entries = self
            .walker
            .collect_visible(&roots, ctx.user_id, role)
            .await?;

        info!(
            actor_id = %ctx.user_id,
            roots = roots.len(),
            entries = entries.len(),
            archive = %archive_name,
            "Zip plan built"
        );
        Ok(DownloadPlan::Zip(ZipPlan {
            archive_name,
            entries,
        }))
    }
}
