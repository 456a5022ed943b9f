//! Inbound status-change notifications.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Published by downstream pipelines (e.g. ingestion) to move a node, or
/// every node of a project, to a new status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangedEvent {
    /// Target a single node.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    /// Target every node of a project. Takes precedence over `file_id`.
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// New status, e.g. `"UPLOADED"`.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_payload() {
        let raw = r#"{"fileId":"00000000-0000-0000-0000-000000000001","status":"UPLOADED"}"#;
        let event: StatusChangedEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.file_id, Some(Uuid::from_u128(1)));
        assert!(event.project_id.is_none());
        assert_eq!(event.status, "UPLOADED");
    }
}
