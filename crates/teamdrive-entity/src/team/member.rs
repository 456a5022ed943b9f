//! Team member value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::MemberRole;

/// One membership record from the team directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// The team.
    pub team_id: Uuid,
    /// The user.
    pub user_id: Uuid,
    /// The user's role in the team.
    pub role: MemberRole,
}
