//! Team directory: the single lookup the storage service needs from the
//! team service.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use teamdrive_core::result::AppResult;
use teamdrive_entity::TeamMember;

pub use http::HttpTeamDirectory;
pub use memory::MemoryTeamDirectory;

/// Resolves a user's membership in a team.
#[async_trait]
pub trait TeamDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Return the membership, or `None` if the user is not in the team.
    async fn get_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<Option<TeamMember>>;
}
