//! Node type and lifecycle status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a node holds bytes or children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "node_type", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    /// A file backed by a blob object.
    File,
    /// A folder; never has a storage key.
    Folder,
}

impl NodeType {
    /// Return the type as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Folder => "FOLDER",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload lifecycle status.
///
/// `Pending -> Uploaded -> Updating -> Uploaded`; never back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "node_status", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeStatus {
    /// Metadata created, bytes not yet confirmed.
    Pending,
    /// Bytes confirmed in the blob store.
    Uploaded,
    /// A replacement upload is in flight.
    Updating,
}

impl NodeStatus {
    /// Return the status as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Uploaded => "UPLOADED",
            Self::Updating => "UPDATING",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = teamdrive_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "UPLOADED" => Ok(Self::Uploaded),
            "UPDATING" => Ok(Self::Updating),
            _ => Err(teamdrive_core::AppError::validation(format!(
                "Invalid node status: '{s}'. Expected one of: PENDING, UPLOADED, UPDATING"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("uploaded".parse::<NodeStatus>().unwrap(), NodeStatus::Uploaded);
        assert_eq!("UPDATING".parse::<NodeStatus>().unwrap(), NodeStatus::Updating);
        assert!("done".parse::<NodeStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_uppercase() {
        assert_eq!(serde_json::to_string(&NodeType::Folder).unwrap(), "\"FOLDER\"");
        assert_eq!(serde_json::to_string(&NodeStatus::Pending).unwrap(), "\"PENDING\"");
    }
}
