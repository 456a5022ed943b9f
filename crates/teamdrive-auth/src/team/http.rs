//! Team directory backed by the team service's HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use teamdrive_core::config::team::TeamDirectoryConfig;
use teamdrive_core::error::{AppError, ErrorKind};
use teamdrive_core::result::AppResult;
use teamdrive_entity::{MemberRole, TeamMember};

use super::TeamDirectory;

/// Body of `GET /teams/{team_id}/members/{user_id}`.
#[derive(Debug, Deserialize)]
struct MemberResponse {
    role: MemberRole,
}

/// HTTP client for membership lookups. A 404 means "not a member".
#[derive(Debug, Clone)]
pub struct HttpTeamDirectory {
    client: Client,
    base_url: String,
}

impl HttpTeamDirectory {
    /// Build a client from configuration.
    pub fn new(config: &TeamDirectoryConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build team directory client",
                    e,
                )
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TeamDirectory for HttpTeamDirectory {
    async fn get_member(&self, team_id: Uuid, user_id: Uuid) -> AppResult<Option<TeamMember>> {
        let url = format!("{}/teams/{team_id}/members/{user_id}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Team directory unreachable", e)
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(%team_id, %user_id, "Not a team member");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Team directory returned {}",
                response.status()
            )));
        }

        let body: MemberResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Malformed team directory response",
                e,
            )
        })?;
        Ok(Some(TeamMember {
            team_id,
            user_id,
            role: body.role,
        }))
    }
}
