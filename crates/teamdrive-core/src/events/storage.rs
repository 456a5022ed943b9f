//! Storage lifecycle events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the upload orchestrator and the bulk mutation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorageEvent {
    /// An upload (fresh or update) was finalized.
    UploadCompleted {
        /// The file ID.
        file_id: Uuid,
        /// Project the file belongs to, if shared.
        project_id: Option<Uuid>,
        /// The user the completion is attributed to.
        actor_id: Uuid,
        /// Status after finalization.
        status: String,
    },
    /// A document is ready for ingestion and indexing.
    DocumentProcess {
        /// The file ID.
        file_id: Uuid,
        /// Blob key holding the bytes.
        storage_key: String,
        /// Effective display name.
        name: String,
        /// The user the document is attributed to.
        actor_id: Uuid,
        /// Project the file belongs to, if shared.
        project_id: Option<Uuid>,
    },
    /// Nodes were permanently removed.
    DocumentDeleted {
        /// Every removed node ID, descendants included.
        file_ids: Vec<Uuid>,
        /// The user who deleted them.
        actor_id: Uuid,
        /// Project scope of the delete request.
        project_id: Option<Uuid>,
    },
}

impl StorageEvent {
    /// Routing key for this event.
    pub fn routing_key(&self) -> &'static str {
        match self {
            Self::UploadCompleted { .. } => "upload.completed",
            Self::DocumentProcess { .. } => "document.process",
            Self::DocumentDeleted { .. } => "document.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DomainEvent;

    #[test]
    fn test_routing_keys() {
        let actor = Uuid::new_v4();
        let event = DomainEvent::storage(
            actor,
            StorageEvent::DocumentDeleted {
                file_ids: vec![Uuid::new_v4()],
                actor_id: actor,
                project_id: None,
            },
        );
        assert_eq!(event.routing_key(), "document.deleted");
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let event = DomainEvent::storage(
            Uuid::nil(),
            StorageEvent::UploadCompleted {
                file_id: Uuid::nil(),
                project_id: None,
                actor_id: Uuid::nil(),
                status: "UPLOADED".to_string(),
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["domain"], "Storage");
        assert_eq!(json["payload"]["event"]["type"], "UploadCompleted");
        assert_eq!(json["payload"]["event"]["status"], "UPLOADED");
    }
}
