//! Node query filters and sort orders.
//!
//! A [`NodeFilter`] is a conjunction of optional constraints. The PostgreSQL
//! store translates it into a `WHERE` clause; the in-memory store evaluates
//! [`NodeFilter::matches`] directly. Both must agree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::NodeType;
use super::model::Node;
use super::visibility::Visibility;

/// Constraint on `project_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectScope {
    /// No constraint.
    #[default]
    Any,
    /// `project_id IS NULL`.
    Personal,
    /// `project_id = id`.
    Project(Uuid),
}

/// Constraint on `parent_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentScope {
    /// No constraint.
    #[default]
    Any,
    /// `parent_id IS NULL`.
    Root,
    /// `parent_id = id`.
    Folder(Uuid),
}

impl ParentScope {
    /// Root when `None`, otherwise the given folder.
    pub fn from_parent(parent_id: Option<Uuid>) -> Self {
        match parent_id {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }
}

/// Visibility union applied to team members without an elevated role:
/// owned by the actor, or `Team` within `team_id`, or `Specific` listing
/// the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessScope {
    /// The requesting user.
    pub actor_id: Uuid,
    /// The team whose `Team`-visible nodes are included.
    pub team_id: Uuid,
}

impl AccessScope {
    /// Evaluate the union against one node.
    pub fn admits(&self, node: &Node) -> bool {
        node.owner_id == self.actor_id
            || (node.visibility == Visibility::Team && node.team_id == Some(self.team_id))
            || (node.visibility == Visibility::Specific
                && node.allowed_user_ids.contains(&self.actor_id))
    }
}

/// Conjunction of optional node constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// `id = ANY(ids)`.
    pub ids: Option<Vec<Uuid>>,
    /// `owner_id = owner`.
    pub owner_id: Option<Uuid>,
    /// Constraint on `project_id`.
    pub project: ProjectScope,
    /// Constraint on `parent_id`.
    pub parent: ParentScope,
    /// `node_type = type`.
    pub node_type: Option<NodeType>,
    /// Visibility union for non-elevated team members.
    pub access: Option<AccessScope>,
}

impl NodeFilter {
    /// A filter matching every node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given ids.
    pub fn with_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Restrict to nodes owned by `owner_id`.
    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Restrict the project scope.
    pub fn with_project(mut self, project: ProjectScope) -> Self {
        self.project = project;
        self
    }

    /// Restrict the parent scope.
    pub fn with_parent(mut self, parent: ParentScope) -> Self {
        self.parent = parent;
        self
    }

    /// Restrict to one node type.
    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Apply the member visibility union.
    pub fn with_access(mut self, access: AccessScope) -> Self {
        self.access = Some(access);
        self
    }

    /// Evaluate the filter against one node.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&node.id) {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if node.owner_id != owner_id {
                return false;
            }
        }
        let project_ok = match self.project {
            ProjectScope::Any => true,
            ProjectScope::Personal => node.project_id.is_none(),
            ProjectScope::Project(id) => node.project_id == Some(id),
        };
        if !project_ok {
            return false;
        }
        let parent_ok = match self.parent {
            ParentScope::Any => true,
            ParentScope::Root => node.parent_id.is_none(),
            ParentScope::Folder(id) => node.parent_id == Some(id),
        };
        if !parent_ok {
            return false;
        }
        if let Some(node_type) = self.node_type {
            if node.node_type != node_type {
                return false;
            }
        }
        match &self.access {
            Some(access) => access.admits(node),
            None => true,
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSort {
    /// Folders before files, then newest created first.
    #[default]
    FoldersFirstNewest,
}

impl NodeSort {
    /// Compare two nodes under this ordering.
    pub fn compare(&self, a: &Node, b: &Node) -> std::cmp::Ordering {
        let newest = b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id));
        match self {
            Self::FoldersFirstNewest => b.is_folder().cmp(&a.is_folder()).then(newest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::model::CreateNode;
    use chrono::{Duration, Utc};

    fn node(node_type: NodeType, owner: u128, visibility: Visibility) -> Node {
        Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type,
                parent_id: None,
                original_name: "n".to_string(),
                owner_id: Uuid::from_u128(owner),
                project_id: Some(Uuid::from_u128(100)),
                team_id: Some(Uuid::from_u128(200)),
                visibility,
                allowed_user_ids: Vec::new(),
            },
        )
    }

    #[test]
    fn test_access_scope_team_requires_same_team() {
        let scope = AccessScope {
            actor_id: Uuid::from_u128(2),
            team_id: Uuid::from_u128(200),
        };
        let mut n = node(NodeType::File, 1, Visibility::Team);
        assert!(scope.admits(&n));
        n.team_id = Some(Uuid::from_u128(999));
        assert!(!scope.admits(&n));
    }

    #[test]
    fn test_filter_conjunction() {
        let n = node(NodeType::File, 1, Visibility::Private);
        let base = NodeFilter::new().with_project(ProjectScope::Project(Uuid::from_u128(100)));
        assert!(base.matches(&n));
        assert!(base.clone().with_parent(ParentScope::Root).matches(&n));
        assert!(!base.clone().with_owner(Uuid::from_u128(2)).matches(&n));
        assert!(!base.clone().with_node_type(NodeType::Folder).matches(&n));
        assert!(!NodeFilter::new().with_project(ProjectScope::Personal).matches(&n));
        assert!(
            !base
                .with_access(AccessScope {
                    actor_id: Uuid::from_u128(2),
                    team_id: Uuid::from_u128(200),
                })
                .matches(&n)
        );
    }

    #[test]
    fn test_folders_first_then_newest() {
        let mut old_folder = node(NodeType::Folder, 1, Visibility::Team);
        old_folder.created_at = Utc::now() - Duration::hours(2);
        let mut new_file = node(NodeType::File, 1, Visibility::Team);
        new_file.created_at = Utc::now();
        let mut old_file = node(NodeType::File, 1, Visibility::Team);
        old_file.created_at = Utc::now() - Duration::hours(1);

        let mut items = vec![old_file.clone(), new_file.clone(), old_folder.clone()];
        items.sort_by(|a, b| NodeSort::FoldersFirstNewest.compare(a, b));
        assert_eq!(items[0].id, old_folder.id);
        assert_eq!(items[1].id, new_file.id);
        assert_eq!(items[2].id, old_file.id);
    }
}
