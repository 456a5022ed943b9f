//! Folder creation and browsing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;
use teamdrive_core::types::pagination::{PageRequest, PageResponse};
use teamdrive_database::NodeStore;
use teamdrive_entity::{
    AccessScope, CreateNode, MemberRole, Node, NodeFilter, NodeSort, NodeType, ParentScope,
};

use crate::context::RequestContext;
use crate::file::requests::CreateFolderRequest;
use crate::scope::resolve_placement;

/// A folder and one page of its children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContents {
    /// The folder itself.
    pub folder: Node,
    /// Visible children, folders first.
    pub children: PageResponse<Node>,
}

/// Creates and browses folders.
#[derive(Clone)]
pub struct FolderService {
    nodes: Arc<dyn NodeStore>,
    resolver: Arc<PermissionResolver>,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish()
    }
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(nodes: Arc<dyn NodeStore>, resolver: Arc<PermissionResolver>) -> Self {
        Self { nodes, resolver }
    }

    /// Create a folder at the root or under `parent_id`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Node> {
        req.validate()?;
        let placement =
            resolve_placement(&self.resolver, ctx.user_id, &req.scope, req.parent_id).await?;

        let node = Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type: NodeType::Folder,
                parent_id: placement.parent.as_ref().map(|p| p.id),
                original_name: req.name,
                owner_id: ctx.user_id,
                project_id: req.scope.project_id,
                team_id: req.scope.team_id,
                visibility: req.visibility.unwrap_or_default(),
                allowed_user_ids: req.allowed_user_ids.unwrap_or_default(),
            },
        );
        let node = self.nodes.create(&node).await?;

        info!(
            folder_id = %node.id,
            actor_id = %ctx.user_id,
            parent_id = ?node.parent_id,
            visibility = ?node.visibility,
            "Folder created"
        );
        Ok(node)
    }

    /// Load a folder and one page of the children the actor may see.
    pub async fn get_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        scope: RequestScope,
        page: PageRequest,
    ) -> AppResult<FolderContents> {
        scope.require_complete()?;
        let resolved = self.resolver.resolve(folder_id, ctx.user_id, &scope).await?;
        let folder = resolved.node;
        if !folder.is_folder() {
            return Err(AppError::bad_request(format!(
                "Node {folder_id} is not a folder"
            )));
        }

        let filter = children_filter(&folder, ctx.user_id, resolved.role);
        let total = self.nodes.count(&filter).await?;
        let data = self
            .nodes
            .find(&filter, NodeSort::FoldersFirstNewest, page.skip(), Some(page.limit))
            .await?;

        Ok(FolderContents {
            folder,
            children: PageResponse::new(data, page, total),
        })
    }
}

/// Children visible to the actor. Team owners and admins see all of them;
/// everyone else gets the visibility union of the folder's team, or only
/// their own nodes in a personal folder.
fn children_filter(folder: &Node, actor_id: Uuid, role: Option<MemberRole>) -> NodeFilter {
    let filter = NodeFilter::new().with_parent(ParentScope::Folder(folder.id));
    if role.is_some_and(|r| r.bypasses_visibility()) {
        return filter;
    }
    match folder.team_id {
        Some(team_id) => filter.with_access(AccessScope { actor_id, team_id }),
        None => filter.with_owner(actor_id),
    }
}
