//! Permission resolver for a single node.
//!
//! Resolution order:
//! 1. Team role — when the request carries both project and team, the
//!    actor's role is looked up; no membership is a bad request.
//! 2. Existence — a missing node is not found.
//! 3. Tenant — a node from another team is a bad request.
//! 4. Owner — owners have full access.
//! 5. Team role — team owners and admins have full access. A node that
//!    belongs to a team is only reachable by that team's members; without
//!    a role from the request, the role comes from the node's own team.
//! 6. Visibility — `Private` and unlisted `Specific` are forbidden.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;
use teamdrive_database::NodeStore;
use teamdrive_entity::{MemberRole, Node, Visibility};

use super::scope::RequestScope;
use crate::team::TeamDirectory;

/// Why access to a node was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSource {
    /// The actor owns the node.
    Owner,
    /// The actor is a team owner or admin.
    TeamRole,
    /// The node's visibility admits the actor.
    Visibility,
}

/// A node the actor may act on, with the role resolved along the way.
#[derive(Debug, Clone)]
pub struct ResolvedNode {
    /// The loaded node.
    pub node: Node,
    /// The actor's role in the node's team, if one was resolved.
    pub role: Option<MemberRole>,
    /// Which rule granted access.
    pub source: AccessSource,
}

/// Decides whether an actor may act on a node.
#[derive(Clone)]
pub struct PermissionResolver {
    nodes: Arc<dyn NodeStore>,
    directory: Arc<dyn TeamDirectory>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a new permission resolver.
    pub fn new(nodes: Arc<dyn NodeStore>, directory: Arc<dyn TeamDirectory>) -> Self {
        Self { nodes, directory }
    }

    /// Resolve the actor's role when the scope names both a project and a
    /// team. Returns `Ok(None)` for personal or partial scopes.
    pub async fn resolve_role(
        &self,
        actor_id: Uuid,
        scope: &RequestScope,
    ) -> AppResult<Option<MemberRole>> {
        let Some((_, team_id)) = scope.project_and_team() else {
            return Ok(None);
        };
        match self.directory.get_member(team_id, actor_id).await? {
            Some(member) => Ok(Some(member.role)),
            None => Err(AppError::bad_request(format!(
                "Role not found for user {actor_id} in team {team_id}"
            ))),
        }
    }

    /// Load `node_id` and check the actor may act on it.
    pub async fn resolve(
        &self,
        node_id: Uuid,
        actor_id: Uuid,
        scope: &RequestScope,
    ) -> AppResult<ResolvedNode> {
        let role = self.resolve_role(actor_id, scope).await?;
        self.resolve_with_role(node_id, actor_id, scope, role).await
    }

    /// Same as [`resolve`](Self::resolve) with the role already known.
    pub async fn resolve_with_role(
        &self,
        node_id: Uuid,
        actor_id: Uuid,
        scope: &RequestScope,
        role: Option<MemberRole>,
    ) -> AppResult<ResolvedNode> {
        let node = self
            .nodes
            .find_by_id(node_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {node_id} not found")))?;

        if let Some(team_id) = scope.team_id {
            if node.team_id != Some(team_id) {
                return Err(AppError::bad_request(format!(
                    "Node {node_id} does not belong to team {team_id}"
                )));
            }
        }

        let role = self.node_team_role(&node, actor_id, role).await?;
        let source = Self::check(&node, actor_id, role)?;
        debug!(
            node_id = %node_id,
            actor_id = %actor_id,
            source = ?source,
            "Node access granted"
        );
        Ok(ResolvedNode { node, role, source })
    }

    /// Role of a non-owner in the node's team. Without one, a team node is
    /// off limits whatever its visibility.
    async fn node_team_role(
        &self,
        node: &Node,
        actor_id: Uuid,
        role: Option<MemberRole>,
    ) -> AppResult<Option<MemberRole>> {
        if role.is_some() || node.owner_id == actor_id {
            return Ok(role);
        }
        let Some(team_id) = node.team_id else {
            return Ok(None);
        };
        match self.directory.get_member(team_id, actor_id).await? {
            Some(member) => Ok(Some(member.role)),
            None => Err(AppError::forbidden(format!(
                "Node {} belongs to a team the user is not a member of",
                node.id
            ))),
        }
    }

    fn check(node: &Node, actor_id: Uuid, role: Option<MemberRole>) -> AppResult<AccessSource> {
        if node.owner_id == actor_id {
            return Ok(AccessSource::Owner);
        }
        if role.is_some_and(|r| r.bypasses_visibility()) {
            return Ok(AccessSource::TeamRole);
        }
        match node.visibility {
            Visibility::Team => Ok(AccessSource::Visibility),
            Visibility::Specific if node.allowed_user_ids.contains(&actor_id) => {
                Ok(AccessSource::Visibility)
            }
            Visibility::Specific => Err(AppError::forbidden(format!(
                "Node {} is shared with specific users only",
                node.id
            ))),
            Visibility::Private => Err(AppError::forbidden(format!(
                "Node {} is private",
                node.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::MemoryTeamDirectory;
    use teamdrive_core::error::ErrorKind;
    use teamdrive_database::MemoryNodeStore;
    use teamdrive_entity::{CreateNode, NodeType};

    struct Fixture {
        resolver: PermissionResolver,
        nodes: Arc<MemoryNodeStore>,
        directory: Arc<MemoryTeamDirectory>,
        team: Uuid,
        project: Uuid,
        owner: Uuid,
        member: Uuid,
    }

    fn fixture() -> Fixture {
        let nodes = Arc::new(MemoryNodeStore::new());
        let directory = Arc::new(MemoryTeamDirectory::new());
        let team = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        directory.insert(team, owner, MemberRole::Member);
        directory.insert(team, member, MemberRole::Member);
        Fixture {
            resolver: PermissionResolver::new(nodes.clone(), directory.clone()),
            nodes,
            directory,
            team,
            project: Uuid::new_v4(),
            owner,
            member,
        }
    }

    async fn seed(fx: &Fixture, visibility: Visibility, allowed: Vec<Uuid>) -> Node {
        let node = Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type: NodeType::File,
                parent_id: None,
                original_name: "plan.pdf".to_string(),
                owner_id: fx.owner,
                project_id: Some(fx.project),
                team_id: Some(fx.team),
                visibility,
                allowed_user_ids: allowed,
            },
        );
        fx.nodes.create(&node).await.unwrap()
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Team, vec![]).await;
        let stranger = Uuid::new_v4();
        let err = fx
            .resolver
            .resolve(node.id, stranger, &RequestScope::shared(fx.project, fx.team))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_missing_node_is_not_found() {
        let fx = fixture();
        let err = fx
            .resolver
            .resolve(Uuid::new_v4(), fx.member, &RequestScope::shared(fx.project, fx.team))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cross_team_is_bad_request() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Team, vec![]).await;
        let other_team = Uuid::new_v4();
        fx.directory.insert(other_team, fx.member, MemberRole::Admin);
        let err = fx
            .resolver
            .resolve(node.id, fx.member, &RequestScope::shared(fx.project, other_team))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_private_forbidden_for_member_allowed_for_admin() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Private, vec![]).await;
        let scope = RequestScope::shared(fx.project, fx.team);

        let err = fx.resolver.resolve(node.id, fx.member, &scope).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        fx.directory.insert(fx.team, fx.member, MemberRole::Admin);
        let resolved = fx.resolver.resolve(node.id, fx.member, &scope).await.unwrap();
        assert_eq!(resolved.source, AccessSource::TeamRole);
        assert_eq!(resolved.role, Some(MemberRole::Admin));
    }

    #[tokio::test]
    async fn test_specific_requires_listing() {
        let fx = fixture();
        let listed = seed(&fx, Visibility::Specific, vec![fx.member]).await;
        let unlisted = seed(&fx, Visibility::Specific, vec![]).await;
        let scope = RequestScope::shared(fx.project, fx.team);

        let ok = fx.resolver.resolve(listed.id, fx.member, &scope).await.unwrap();
        assert_eq!(ok.source, AccessSource::Visibility);
        let err = fx
            .resolver
            .resolve(unlisted.id, fx.member, &scope)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_team_node_requires_membership_without_scope() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Team, vec![]).await;
        let outsider = Uuid::new_v4();

        let err = fx
            .resolver
            .resolve(node.id, outsider, &RequestScope::personal())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let resolved = fx
            .resolver
            .resolve(node.id, fx.member, &RequestScope::personal())
            .await
            .unwrap();
        assert_eq!(resolved.source, AccessSource::Visibility);
        assert_eq!(resolved.role, Some(MemberRole::Member));
    }

    #[tokio::test]
    async fn test_admin_role_found_through_node_team() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Private, vec![]).await;
        let admin = Uuid::new_v4();
        fx.directory.insert(fx.team, admin, MemberRole::Admin);

        let resolved = fx
            .resolver
            .resolve(node.id, admin, &RequestScope::personal())
            .await
            .unwrap();
        assert_eq!(resolved.source, AccessSource::TeamRole);
    }

    #[tokio::test]
    async fn test_owner_passes_without_scope() {
        let fx = fixture();
        let node = seed(&fx, Visibility::Private, vec![]).await;
        let resolved = fx
            .resolver
            .resolve(node.id, fx.owner, &RequestScope::personal())
            .await
            .unwrap();
        assert_eq!(resolved.source, AccessSource::Owner);
        assert!(resolved.role.is_none());
    }
}
