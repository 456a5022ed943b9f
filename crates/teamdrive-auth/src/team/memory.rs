//! In-memory team directory.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use teamdrive_core::result::AppResult;
use teamdrive_entity::{MemberRole, TeamMember};

use super::TeamDirectory;

/// Directory seeded explicitly, for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryTeamDirectory {
    members: DashMap<(Uuid, Uuid), MemberRole>,
}

impl MemoryTeamDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a membership.
    pub fn insert(&self, team_id: Uuid, user_id: Uuid, role: MemberRole) {
        self.members.insert((team_id, user_id), role);
    }

    /// Remove a membership.
    pub fn remove(&self, team_id: Uuid, user_id: Uuid) {
        self.members.remove(&(team_id, user_id));
    }
}

#[async_trait]
impl TeamDirectory for MemoryTeamDirectory {
    async fn get_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<Option<TeamMember>> {
        Ok(self
            .members
            .get(&(team_id, user_id))
            .map(|role| TeamMember {
                team_id,
                user_id,
                role: *role,
            }))
    }
}
