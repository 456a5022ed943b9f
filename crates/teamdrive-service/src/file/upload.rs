//! Two-phase upload orchestration.
//!
//! A fresh upload creates a `Pending` node and hands the client a presigned
//! PUT URL. The client writes the bytes straight to the blob store and the
//! upload is finalized either by the storage webhook (`complete_upload`)
//! or by an explicit client confirmation (`confirm_upload`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::events::StorageEvent;
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::blob::BlobStore;
use teamdrive_database::NodeStore;
use teamdrive_entity::{CreateNode, Node, NodeStatus, NodeType, NodeUpdate, Visibility};

use super::requests::{BeginUpdateRequest, BeginUploadRequest};
use crate::context::RequestContext;
use crate::events::EventEmitter;
use crate::scope::resolve_placement;
use crate::settings::ServiceSettings;

/// Content type recorded when the blob store reports none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Where the client should send the bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginUploadResponse {
    /// The file node.
    pub file_id: Uuid,
    /// Blob key the bytes go to.
    pub storage_key: String,
    /// Presigned PUT URL.
    pub upload_url: String,
    /// Lifetime of `upload_url`.
    pub expires_in_seconds: u64,
}

/// Creates pending files and finalizes them once the bytes have landed.
#[derive(Clone)]
pub struct UploadService {
    nodes: Arc<dyn NodeStore>,
    blobs: Arc<dyn BlobStore>,
    resolver: Arc<PermissionResolver>,
    events: EventEmitter,
    settings: ServiceSettings,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        nodes: Arc<dyn NodeStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<PermissionResolver>,
        events: EventEmitter,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            nodes,
            blobs,
            resolver,
            events,
            settings,
        }
    }

    /// Create a `Pending` file and presign its upload.
    pub async fn begin_upload(
        &self,
        ctx: &RequestContext,
        req: BeginUploadRequest,
    ) -> AppResult<BeginUploadResponse> {
        req.validate()?;
        let placement =
            resolve_placement(&self.resolver, ctx.user_id, &req.scope, req.parent_id).await?;

        let node = Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type: NodeType::File,
                parent_id: placement.parent.as_ref().map(|p| p.id),
                original_name: req.original_name,
                owner_id: ctx.user_id,
                project_id: req.scope.project_id,
                team_id: req.scope.team_id,
                visibility: Visibility::Private,
                allowed_user_ids: Vec::new(),
            },
        );
        let node = self.nodes.create(&node).await?;
        let storage_key = node
            .storage_key
            .clone()
            .ok_or_else(|| AppError::internal("New file has no storage key"))?;

        let upload_url = self
            .blobs
            .presigned_put(&storage_key, self.settings.presign_expiry)
            .await?;

        info!(
            file_id = %node.id,
            actor_id = %ctx.user_id,
            storage_key = %storage_key,
            parent_id = ?node.parent_id,
            "Upload initiated"
        );

        Ok(BeginUploadResponse {
            file_id: node.id,
            storage_key,
            upload_url,
            expires_in_seconds: self.settings.presign_expiry.as_secs(),
        })
    }

    /// Finalize an upload reported by the blob store.
    ///
    /// Events are attributed to the node owner. Calling this twice for the
    /// same key leaves the node in the same state.
    pub async fn complete_upload(&self, storage_key: &str) -> AppResult<Node> {
        let node = self
            .nodes
            .find_by_storage_key(storage_key)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No file holds storage key '{storage_key}'"))
            })?;
        let actor_id = node.owner_id;
        self.finalize(node, actor_id).await
    }

    /// Mark an existing file as `Updating` and presign a PUT for its key.
    pub async fn begin_update(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        req: BeginUpdateRequest,
    ) -> AppResult<BeginUploadResponse> {
        req.validate()?;
        req.scope.require_complete()?;
        let node = self
            .resolver
            .resolve(file_id, ctx.user_id, &req.scope)
            .await?
            .node;
        if !node.is_file() {
            return Err(AppError::bad_request(format!("Node {file_id} is not a file")));
        }
        if node.status == NodeStatus::Pending {
            return Err(AppError::bad_request(format!(
                "File {file_id} has not finished its first upload"
            )));
        }
        let storage_key = node
            .storage_key
            .clone()
            .ok_or_else(|| AppError::internal(format!("File {file_id} has no storage key")))?;

        let update = NodeUpdate {
            status: Some(NodeStatus::Updating),
            pending_new_name: Some(Some(req.new_name)),
            ..NodeUpdate::default()
        };
        self.nodes
            .update_one(file_id, &update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {file_id} not found")))?;

        let upload_url = self
            .blobs
            .presigned_put(&storage_key, self.settings.presign_expiry)
            .await?;

        info!(file_id = %file_id, actor_id = %ctx.user_id, "Update initiated");

        Ok(BeginUploadResponse {
            file_id,
            storage_key,
            upload_url,
            expires_in_seconds: self.settings.presign_expiry.as_secs(),
        })
    }

    /// Finalize an upload on behalf of the confirming client.
    pub async fn confirm_upload(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        scope: RequestScope,
    ) -> AppResult<Node> {
        scope.require_complete()?;
        let node = self.resolver.resolve(file_id, ctx.user_id, &scope).await?.node;
        if !node.is_file() {
            return Err(AppError::bad_request(format!("Node {file_id} is not a file")));
        }
        self.finalize(node, ctx.user_id).await
    }

    async fn finalize(&self, node: Node, actor_id: Uuid) -> AppResult<Node> {
        let storage_key = node
            .storage_key
            .clone()
            .ok_or_else(|| AppError::bad_request(format!("Node {} is not a file", node.id)))?;

        let meta = self.blobs.stat_object(&storage_key).await?;
        let (size_bytes, mimetype) = match meta {
            Some(meta) => (
                meta.size_bytes,
                meta.content_type
                    .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
            ),
            None => (0, FALLBACK_CONTENT_TYPE.to_string()),
        };
        let name = node
            .pending_new_name
            .clone()
            .unwrap_or_else(|| node.original_name.clone());

        let update = NodeUpdate {
            status: Some(NodeStatus::Uploaded),
            size_bytes: Some(size_bytes),
            mimetype: Some(Some(mimetype)),
            original_name: Some(name.clone()),
            pending_new_name: Some(None),
            ..NodeUpdate::default()
        };
        let updated = self
            .nodes
            .update_one(node.id, &update)
            .await
            .inspect_err(|e| {
                error!(
                    operation = "finalize_upload",
                    file_id = %node.id,
                    actor_id = %actor_id,
                    error = %e,
                    "Failed to finalize upload"
                );
            })?
            .ok_or_else(|| AppError::not_found(format!("Node {} not found", node.id)))?;

        info!(
            file_id = %updated.id,
            actor_id = %actor_id,
            size_bytes,
            "Upload completed"
        );

        self.events
            .emit(
                actor_id,
                StorageEvent::UploadCompleted {
                    file_id: updated.id,
                    project_id: updated.project_id,
                    actor_id,
                    status: NodeStatus::Uploaded.as_str().to_string(),
                },
            )
            .await;
        self.events
            .emit(
                actor_id,
                StorageEvent::DocumentProcess {
                    file_id: updated.id,
                    storage_key,
                    name,
                    actor_id,
                    project_id: updated.project_id,
                },
            )
            .await;

        Ok(updated)
    }
}
