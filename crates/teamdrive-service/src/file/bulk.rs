//! Bulk mutation: multi-node patch with move inheritance, and recursive
//! delete.
//!
//! A move copies the destination folder's access fields (visibility,
//! allow-list, team, project) onto every moved node in the same write as
//! the new `parent_id`. Descendants of a moved folder keep their own
//! fields.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::events::StorageEvent;
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::blob::BlobStore;
use teamdrive_database::NodeStore;
use teamdrive_entity::{
    AccessScope, MemberRole, Node, NodeFilter, NodeType, NodeUpdate, ProjectScope,
    UpdateOutcome,
};

use super::requests::{BulkDeleteRequest, BulkUpdateRequest};
use crate::context::RequestContext;
use crate::events::EventEmitter;
use crate::tree::TreeWalker;

/// Patches and deletes many nodes at once.
#[derive(Clone)]
pub struct BulkService {
    nodes: Arc<dyn NodeStore>,
    blobs: Arc<dyn BlobStore>,
    resolver: Arc<PermissionResolver>,
    walker: TreeWalker,
    events: EventEmitter,
}

impl std::fmt::Debug for BulkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkService")
            .field("walker", &self.walker)
            .finish()
    }
}

impl BulkService {
    /// Creates a new bulk service.
    pub fn new(
        nodes: Arc<dyn NodeStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<PermissionResolver>,
        walker: TreeWalker,
        events: EventEmitter,
    ) -> Self {
        Self {
            nodes,
            blobs,
            resolver,
            walker,
            events,
        }
    }

    /// Patch every listed node the actor may modify, moving them when a
    /// destination is given.
    pub async fn update_many(
        &self,
        ctx: &RequestContext,
        req: BulkUpdateRequest,
    ) -> AppResult<UpdateOutcome> {
        req.validate()?;
        req.scope.require_complete()?;
        let role = self.resolver.resolve_role(ctx.user_id, &req.scope).await?;

        let inherited = match req.parent_id {
            Some(destination_id) => Some(
                self.check_move(ctx.user_id, &req.scope, role, destination_id, &req.ids)
                    .await?,
            ),
            None => None,
        };

        let patch = NodeUpdate {
            original_name: req.name,
            status: req.status,
            visibility: req.visibility,
            allowed_user_ids: req.allowed_user_ids,
            ..NodeUpdate::default()
        };
        let moving = inherited.is_some();
        let update = match inherited {
            Some(inherited) => patch.merge(inherited),
            None => patch,
        };
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        let mut filter = mutation_filter(ctx.user_id, &req.scope, role, moving).with_ids(req.ids);
        // Folders stay UPLOADED.
        if update.status.is_some() {
            filter = filter.with_node_type(NodeType::File);
        }
        let outcome = self.nodes.update_many(&filter, &update).await?;
        if outcome.matched == 0 {
            return Err(AppError::bad_request("No nodes matched or permission denied"));
        }

        info!(
            actor_id = %ctx.user_id,
            matched = outcome.matched,
            modified = outcome.modified,
            destination = ?update.parent_id,
            "Bulk update applied"
        );
        Ok(outcome)
    }

    /// Validate a move into `destination_id` and build the access fields
    /// the moved nodes inherit.
    async fn check_move(
        &self,
        actor_id: Uuid,
        scope: &RequestScope,
        role: Option<MemberRole>,
        destination_id: Uuid,
        ids: &[Uuid],
    ) -> AppResult<NodeUpdate> {
        let destination = self
            .nodes
            .find_by_id(destination_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Destination folder {destination_id} not found"))
            })?;
        if !destination.is_folder() {
            return Err(AppError::bad_request(format!(
                "Destination {destination_id} is not a folder"
            )));
        }
        if destination.team_id != scope.team_id {
            return Err(AppError::bad_request(format!(
                "Destination {destination_id} belongs to a different team"
            )));
        }
        let elevated = role.is_some_and(|r| r.bypasses_visibility());
        if !elevated && !destination.visible_to(actor_id) {
            return Err(AppError::forbidden(format!(
                "No permission to move into folder {destination_id}"
            )));
        }
        self.reject_cycle(&destination, ids).await?;

        Ok(NodeUpdate {
            parent_id: Some(destination.id),
            visibility: Some(destination.visibility),
            allowed_user_ids: Some(destination.allowed_user_ids.clone()),
            team_id: Some(destination.team_id),
            project_id: Some(destination.project_id),
            ..NodeUpdate::default()
        })
    }

    /// A node may not move into itself or below itself: none of `ids` may
    /// be the destination or one of its ancestors.
    async fn reject_cycle(&self, destination: &Node, ids: &[Uuid]) -> AppResult<()> {
        let moving: HashSet<Uuid> = ids.iter().copied().collect();
        let mut visited = HashSet::new();
        let mut current = Some(destination.id);
        let mut parent = destination.parent_id;

        while let Some(id) = current {
            if moving.contains(&id) {
                return Err(AppError::bad_request(format!(
                    "Cannot move node {id} into its own subtree"
                )));
            }
            if !visited.insert(id) {
                warn!(node_id = %id, "Ancestor chain loops back on itself");
                break;
            }
            current = parent;
            parent = match current {
                Some(next) => self.nodes.find_by_id(next).await?.and_then(|n| n.parent_id),
                None => None,
            };
        }
        Ok(())
    }

    /// Delete `ids` and everything beneath them. Returns every removed id.
    pub async fn delete_many(
        &self,
        ctx: &RequestContext,
        req: BulkDeleteRequest,
    ) -> AppResult<Vec<Uuid>> {
        req.validate()?;
        req.scope.require_complete()?;
        let role = self.resolver.resolve_role(ctx.user_id, &req.scope).await?;

        let mut seen = HashSet::new();
        let mut roots = Vec::with_capacity(req.ids.len());
        for id in req.ids {
            if !seen.insert(id) {
                continue;
            }
            let resolved = self
                .resolver
                .resolve_with_role(id, ctx.user_id, &req.scope, role)
                .await?;
            roots.push(resolved.node);
        }

        let subtree = self.walker.collect_subtree(&roots).await?;

        if !subtree.storage_keys.is_empty() {
            self.blobs
                .remove_objects(&subtree.storage_keys)
                .await
                .inspect_err(|e| {
                    error!(
                        operation = "delete_many",
                        actor_id = %ctx.user_id,
                        objects = subtree.storage_keys.len(),
                        error = %e,
                        "Failed to remove blobs"
                    );
                })?;
        }
        let deleted = self.nodes.delete_many(&subtree.ids).await.inspect_err(|e| {
            error!(
                operation = "delete_many",
                actor_id = %ctx.user_id,
                nodes = subtree.ids.len(),
                error = %e,
                "Failed to delete node records after removing blobs"
            );
        })?;

        info!(
            actor_id = %ctx.user_id,
            roots = roots.len(),
            deleted,
            objects = subtree.storage_keys.len(),
            "Nodes deleted"
        );

        self.events
            .emit(
                ctx.user_id,
                StorageEvent::DocumentDeleted {
                    file_ids: subtree.ids.clone(),
                    actor_id: ctx.user_id,
                    project_id: req.scope.project_id,
                },
            )
            .await;

        Ok(subtree.ids)
    }
}

/// Which of the listed nodes the actor may modify.
///
/// Personal scope allows only owned personal nodes. In a shared scope team
/// owners and admins may modify anything in the project, other members
/// only their own nodes, widened to the listing visibility union when the
/// update is a move.
fn mutation_filter(
    actor_id: Uuid,
    scope: &RequestScope,
    role: Option<MemberRole>,
    moving: bool,
) -> NodeFilter {
    match scope.project_and_team() {
        None => NodeFilter::new()
            .with_owner(actor_id)
            .with_project(ProjectScope::Personal),
        Some((project_id, team_id)) => {
            let filter = NodeFilter::new().with_project(ProjectScope::Project(project_id));
            if role.is_some_and(|r| r.bypasses_visibility()) {
                filter
            } else if moving {
                filter.with_access(AccessScope { actor_id, team_id })
            } else {
                filter.with_owner(actor_id)
            }
        }
    }
}
