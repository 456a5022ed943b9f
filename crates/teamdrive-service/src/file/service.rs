//! Single-node mutations and inbound status changes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::events::StatusChangedEvent;
use teamdrive_core::result::AppResult;
use teamdrive_database::NodeStore;
use teamdrive_entity::{Node, NodeFilter, NodeStatus, NodeType, NodeUpdate, ProjectScope};
use teamdrive_events::StatusChangeHandler;

use super::bulk::BulkService;
use super::requests::{BulkDeleteRequest, UpdateNodeRequest};
use crate::context::RequestContext;

/// Rename, re-share and delete individual nodes.
#[derive(Clone)]
pub struct FileService {
    nodes: Arc<dyn NodeStore>,
    resolver: Arc<PermissionResolver>,
    bulk: BulkService,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        nodes: Arc<dyn NodeStore>,
        resolver: Arc<PermissionResolver>,
        bulk: BulkService,
    ) -> Self {
        Self {
            nodes,
            resolver,
            bulk,
        }
    }

    /// Patch one node's name or access fields. Children are not touched.
    pub async fn update_one(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateNodeRequest,
    ) -> AppResult<Node> {
        req.validate()?;
        req.scope.require_complete()?;
        self.resolver.resolve(id, ctx.user_id, &req.scope).await?;

        let update = NodeUpdate {
            original_name: req.name,
            visibility: req.visibility,
            allowed_user_ids: req.allowed_user_ids,
            ..NodeUpdate::default()
        };
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        let node = self
            .nodes
            .update_one(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))?;
        info!(node_id = %id, actor_id = %ctx.user_id, "Node updated");
        Ok(node)
    }

    /// Delete one node and everything beneath it.
    pub async fn delete_one(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        scope: RequestScope,
    ) -> AppResult<Vec<Uuid>> {
        self.bulk
            .delete_many(ctx, BulkDeleteRequest { ids: vec![id], scope })
            .await
    }
}

#[async_trait]
impl StatusChangeHandler for FileService {
    /// A project-wide change patches every file of the project; otherwise
    /// only the named file changes. Folders are never touched.
    async fn handle_status_changed(&self, event: StatusChangedEvent) -> AppResult<()> {
        let status: NodeStatus = event.status.parse()?;
        if status == NodeStatus::Pending {
            return Err(AppError::validation("Status cannot be set back to PENDING"));
        }
        let update = NodeUpdate {
            status: Some(status),
            ..NodeUpdate::default()
        };
        let files = NodeFilter::new().with_node_type(NodeType::File);

        match (event.project_id, event.file_id) {
            (Some(project_id), _) => {
                let filter = files.with_project(ProjectScope::Project(project_id));
                let outcome = self.nodes.update_many(&filter, &update).await?;
                info!(
                    project_id = %project_id,
                    status = %status,
                    matched = outcome.matched,
                    modified = outcome.modified,
                    "Project status changed"
                );
            }
            (None, Some(file_id)) => {
                let filter = files.with_ids(vec![file_id]);
                if self.nodes.update_many(&filter, &update).await?.matched == 0 {
                    warn!(file_id = %file_id, "Status change for unknown file");
                    return Err(AppError::not_found(format!("File {file_id} not found")));
                }
                info!(file_id = %file_id, status = %status, "File status changed");
            }
            (None, None) => {
                return Err(AppError::validation(
                    "Status change needs a fileId or a projectId",
                ));
            }
        }
        Ok(())
    }
}
