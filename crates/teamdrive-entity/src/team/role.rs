//! Team member role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user's role within a team, as reported by the team directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    /// Team owner.
    Owner,
    /// Team administrator.
    Admin,
    /// Regular member.
    Member,
}

impl MemberRole {
    /// Owners and admins see every node of the team regardless of visibility.
    pub fn bypasses_visibility(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Return the role as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = teamdrive_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            _ => Err(teamdrive_core::AppError::validation(format!(
                "Invalid member role: '{s}'. Expected one of: OWNER, ADMIN, MEMBER"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass() {
        assert!(MemberRole::Owner.bypasses_visibility());
        assert!(MemberRole::Admin.bypasses_visibility());
        assert!(!MemberRole::Member.bypasses_visibility());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<MemberRole>().unwrap(), MemberRole::Admin);
        assert!("guest".parse::<MemberRole>().is_err());
    }
}
