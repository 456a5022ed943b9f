//! Tenant scope carried by a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teamdrive_core::error::AppError;
use teamdrive_core::result::AppResult;

/// Optional project and team a request is made within.
///
/// Both absent means the actor's personal space. Both present means the
/// shared space of that project, and the actor's team role applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestScope {
    /// Project the request targets.
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// Team owning the project.
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

impl RequestScope {
    /// Personal scope.
    pub fn personal() -> Self {
        Self::default()
    }

    /// Shared scope within a project and team.
    pub fn shared(project_id: Uuid, team_id: Uuid) -> Self {
        Self {
            project_id: Some(project_id),
            team_id: Some(team_id),
        }
    }

    /// `(project_id, team_id)` when both are present.
    pub fn project_and_team(&self) -> Option<(Uuid, Uuid)> {
        self.project_id.zip(self.team_id)
    }

    /// Reject a scope with exactly one of project and team.
    pub fn require_complete(&self) -> AppResult<()> {
        if self.project_id.is_some() != self.team_id.is_some() {
            return Err(AppError::validation(
                "projectId and teamId must be supplied together",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_complete() {
        assert!(RequestScope::personal().require_complete().is_ok());
        assert!(RequestScope::shared(Uuid::new_v4(), Uuid::new_v4())
            .require_complete()
            .is_ok());
        let half = RequestScope {
            project_id: Some(Uuid::new_v4()),
            team_id: None,
        };
        assert!(half.require_complete().is_err());
        assert!(half.project_and_team().is_none());
    }
}
