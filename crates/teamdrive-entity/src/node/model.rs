//! Node entity model.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::{NodeStatus, NodeType};
use super::visibility::Visibility;

/// A file or folder in the storage tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node identifier.
    pub id: Uuid,
    /// File or folder.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Containing folder; `None` at the root.
    pub parent_id: Option<Uuid>,
    /// Blob key, set once for files and never changed.
    pub storage_key: Option<String>,
    /// Display name.
    pub original_name: String,
    /// Content type, known after upload completes.
    pub mimetype: Option<String>,
    /// Size in bytes, zero until upload completes.
    #[serde(rename = "size")]
    pub size_bytes: i64,
    /// The node owner.
    pub owner_id: Uuid,
    /// Project scope; `None` for personal nodes.
    pub project_id: Option<Uuid>,
    /// Team scope; `None` for personal nodes.
    pub team_id: Option<Uuid>,
    /// Visibility level.
    pub visibility: Visibility,
    /// Allow-list consulted when visibility is `Specific`.
    pub allowed_user_ids: Vec<Uuid>,
    /// Upload lifecycle status.
    pub status: NodeStatus,
    /// Name to apply when an in-flight update completes.
    pub pending_new_name: Option<String>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Build a new node from creation data.
    ///
    /// Files start `Pending` with a storage key derived from the id and the
    /// name's extension; folders start `Uploaded` with no key.
    pub fn from_create(id: Uuid, data: CreateNode) -> Self {
        let now = Utc::now();
        let (storage_key, status) = match data.node_type {
            NodeType::File => (
                Some(storage_key_for(id, &data.original_name)),
                NodeStatus::Pending,
            ),
            NodeType::Folder => (None, NodeStatus::Uploaded),
        };
        Self {
            id,
            node_type: data.node_type,
            parent_id: data.parent_id,
            storage_key,
            original_name: data.original_name,
            mimetype: None,
            size_bytes: 0,
            owner_id: data.owner_id,
            project_id: data.project_id,
            team_id: data.team_id,
            visibility: data.visibility,
            allowed_user_ids: data.allowed_user_ids,
            status,
            pending_new_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.node_type == NodeType::Folder
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.node_type == NodeType::File
    }

    /// Check if this node is personal (no project or team).
    pub fn is_personal(&self) -> bool {
        self.project_id.is_none()
    }

    /// Get the name's extension (lowercase, without the dot), if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_lowercase())
    }

    /// Ownership and visibility check, ignoring team roles.
    ///
    /// Owners always pass. Otherwise `Team` passes, `Specific` passes when
    /// the actor is listed, and `Private` fails.
    pub fn visible_to(&self, actor_id: Uuid) -> bool {
        if self.owner_id == actor_id {
            return true;
        }
        match self.visibility {
            Visibility::Private => false,
            Visibility::Team => true,
            Visibility::Specific => self.allowed_user_ids.contains(&actor_id),
        }
    }
}

/// Data required to create a new node record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    /// File or folder.
    pub node_type: NodeType,
    /// Containing folder.
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub original_name: String,
    /// The node owner.
    pub owner_id: Uuid,
    /// Project scope.
    pub project_id: Option<Uuid>,
    /// Team scope.
    pub team_id: Option<Uuid>,
    /// Visibility level.
    pub visibility: Visibility,
    /// Allow-list for `Specific` visibility.
    pub allowed_user_ids: Vec<Uuid>,
}

/// Derive the blob key for a file: the id followed by the name's extension
/// (dot included), or the bare id when the name has none.
pub fn storage_key_for(id: Uuid, original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
