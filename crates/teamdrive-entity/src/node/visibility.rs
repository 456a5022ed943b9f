//! Node visibility.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who besides the owner (and team admins) may see a node.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "node_visibility", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// Owner and team admins only.
    #[default]
    Private,
    /// Every member of the node's team.
    Team,
    /// Users listed in `allowed_user_ids`.
    Specific,
}

impl Visibility {
    /// Return the visibility as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Team => "TEAM",
            Self::Specific => "SPECIFIC",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = teamdrive_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PRIVATE" => Ok(Self::Private),
            "TEAM" => Ok(Self::Team),
            "SPECIFIC" => Ok(Self::Specific),
            _ => Err(teamdrive_core::AppError::validation(format!(
                "Invalid visibility: '{s}'. Expected one of: PRIVATE, TEAM, SPECIFIC"
            ))),
        }
    }
}
