//! Partial node updates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::NodeStatus;
use super::model::Node;
use super::visibility::Visibility;

/// A patch over a node. `None` leaves a field untouched; for nullable
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// New display name.
    pub original_name: Option<String>,
    /// New lifecycle status.
    pub status: Option<NodeStatus>,
    /// New containing folder.
    pub parent_id: Option<Uuid>,
    /// New visibility.
    pub visibility: Option<Visibility>,
    /// New allow-list.
    pub allowed_user_ids: Option<Vec<Uuid>>,
    /// New team scope.
    pub team_id: Option<Option<Uuid>>,
    /// New project scope.
    pub project_id: Option<Option<Uuid>>,
    /// New content type.
    pub mimetype: Option<Option<String>>,
    /// New size.
    pub size_bytes: Option<i64>,
    /// New pending name.
    pub pending_new_name: Option<Option<String>>,
}

impl NodeUpdate {
    /// Check whether the patch touches no field.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: NodeUpdate) -> Self {
        Self {
            original_name: other.original_name.or(self.original_name),
            status: other.status.or(self.status),
            parent_id: other.parent_id.or(self.parent_id),
            visibility: other.visibility.or(self.visibility),
            allowed_user_ids: other.allowed_user_ids.or(self.allowed_user_ids),
            team_id: other.team_id.or(self.team_id),
            project_id: other.project_id.or(self.project_id),
            mimetype: other.mimetype.or(self.mimetype),
            size_bytes: other.size_bytes.or(self.size_bytes),
            pending_new_name: other.pending_new_name.or(self.pending_new_name),
        }
    }

    /// Apply the patch in place. Returns whether any field changed value.
    /// `updated_at` is refreshed regardless.
    pub fn apply(&self, node: &mut Node) -> bool {
        let mut changed = false;
        changed |= assign(&mut node.original_name, &self.original_name);
        changed |= assign(&mut node.status, &self.status);
        changed |= assign(&mut node.visibility, &self.visibility);
        changed |= assign(&mut node.allowed_user_ids, &self.allowed_user_ids);
        changed |= assign(&mut node.team_id, &self.team_id);
        changed |= assign(&mut node.project_id, &self.project_id);
        changed |= assign(&mut node.mimetype, &self.mimetype);
        changed |= assign(&mut node.size_bytes, &self.size_bytes);
        changed |= assign(&mut node.pending_new_name, &self.pending_new_name);
        if let Some(parent_id) = self.parent_id {
            changed |= assign(&mut node.parent_id, &Some(Some(parent_id)));
        }
        node.updated_at = chrono::Utc::now();
        changed
    }
}

fn assign<T: PartialEq + Clone>(slot: &mut T, value: &Option<T>) -> bool {
    match value {
        Some(value) if slot != value => {
            *slot = value.clone();
            true
        }
        _ => false,
    }
}

/// Row counts reported by a bulk update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Rows selected by the filter.
    pub matched: u64,
    /// Rows where at least one field changed value.
    pub modified: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::kind::NodeType;
    use crate::node::model::CreateNode;

    fn file() -> Node {
        Node::from_create(
            Uuid::new_v4(),
            CreateNode {
                node_type: NodeType::File,
                parent_id: None,
                original_name: "a.txt".to_string(),
                owner_id: Uuid::new_v4(),
                project_id: None,
                team_id: None,
                visibility: Visibility::Private,
                allowed_user_ids: Vec::new(),
            },
        )
    }

    #[test]
    fn test_apply_reports_change() {
        let mut node = file();
        let patch = NodeUpdate {
            original_name: Some("b.txt".to_string()),
            ..Default::default()
        };
        assert!(patch.apply(&mut node));
        assert_eq!(node.original_name, "b.txt");
        assert!(!patch.apply(&mut node));
    }

    #[test]
    fn test_apply_clears_nullable_field() {
        let mut node = file();
        node.pending_new_name = Some("next.txt".to_string());
        let patch = NodeUpdate {
            pending_new_name: Some(None),
            ..Default::default()
        };
        assert!(patch.apply(&mut node));
        assert!(node.pending_new_name.is_none());
    }

    #[test]
    fn test_merge_prefers_override() {
        let base = NodeUpdate {
            original_name: Some("x".to_string()),
            visibility: Some(Visibility::Private),
            ..Default::default()
        };
        let over = NodeUpdate {
            visibility: Some(Visibility::Team),
            ..Default::default()
        };
        let merged = base.merge(over);
        assert_eq!(merged.original_name.as_deref(), Some("x"));
        assert_eq!(merged.visibility, Some(Visibility::Team));
        assert!(!merged.is_empty());
        assert!(NodeUpdate::default().is_empty());
    }
}
