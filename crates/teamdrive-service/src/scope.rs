//! Query scoping and placement rules shared by the services.

use uuid::Uuid;

use teamdrive_auth::{PermissionResolver, RequestScope};
use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;
use teamdrive_entity::{AccessScope, MemberRole, Node, NodeFilter, ProjectScope};

/// Base filter for what an actor may list within a scope.
///
/// - Personal scope: nodes the actor owns outside any project.
/// - Shared scope: nodes of the project; actors without an owner/admin role
///   are further limited to the member visibility union.
pub fn listing_filter(actor_id: Uuid, scope: &RequestScope, role: Option<MemberRole>) -> NodeFilter {
    match scope.project_and_team() {
        None => NodeFilter::new()
            .with_owner(actor_id)
            .with_project(ProjectScope::Personal),
        Some((project_id, team_id)) => {
            let filter = NodeFilter::new().with_project(ProjectScope::Project(project_id));
            if role.is_some_and(|r| r.bypasses_visibility()) {
                filter
            } else {
                filter.with_access(AccessScope { actor_id, team_id })
            }
        }
    }
}

/// Where a new node is going, after permission checks.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The actor's team role, when the scope is shared.
    pub role: Option<MemberRole>,
    /// The parent folder, when not placing at the root.
    pub parent: Option<Node>,
}

/// Check that the actor may create a node under `parent_id` within `scope`.
///
/// A shared scope always requires a team role, at the root too. A parent
/// must exist, be a folder the actor may act on, and belong to the same
/// project as the scope.
pub async fn resolve_placement(
    resolver: &PermissionResolver,
    actor_id: Uuid,
    scope: &RequestScope,
    parent_id: Option<Uuid>,
) -> AppResult<Placement> {
    scope.require_complete()?;
    let role = resolver.resolve_role(actor_id, scope).await?;

    let Some(parent_id) = parent_id else {
        return Ok(Placement { role, parent: None });
    };

    let parent = resolver
        .resolve_with_role(parent_id, actor_id, scope, role)
        .await?
        .node;
    if !parent.is_folder() {
        return Err(AppError::bad_request(format!(
            "Parent {parent_id} is not a folder"
        )));
    }
    if parent.project_id != scope.project_id {
        return Err(AppError::bad_request(format!(
            "Parent {parent_id} belongs to a different project"
        )));
    }
    Ok(Placement {
        role,
        parent: Some(parent),
    })
}
