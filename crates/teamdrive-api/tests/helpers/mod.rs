//! Shared test helpers for API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use teamdrive_api::{AppState, build_router};
use teamdrive_auth::MemoryTeamDirectory;
use teamdrive_core::config::app::ServerConfig;
use teamdrive_database::MemoryNodeStore;
use teamdrive_entity::MemberRole;
use teamdrive_events::MemoryEventBus;
use teamdrive_service::{Collaborators, ServiceContainer, ServiceSettings};
use teamdrive_storage::MemoryBlobStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub blobs: Arc<MemoryBlobStore>,
    pub directory: Arc<MemoryTeamDirectory>,
    pub bus: Arc<MemoryEventBus>,
    pub project: Uuid,
    pub team: Uuid,
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let nodes = Arc::new(MemoryNodeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let directory = Arc::new(MemoryTeamDirectory::new());
        let bus = Arc::new(MemoryEventBus::default());
        let services = ServiceContainer::new(
            Collaborators {
                nodes,
                blobs: blobs.clone(),
                directory: directory.clone(),
                events: bus.clone(),
            },
            ServiceSettings::default(),
        );
        let router = build_router(AppState::new(ServerConfig::default(), services));
        Self {
            router,
            blobs,
            directory,
            bus,
            project: Uuid::new_v4(),
            team: Uuid::new_v4(),
        }
    }

    /// Register a new user in the test team.
    pub fn member(&self, role: MemberRole) -> Uuid {
        let user = Uuid::new_v4();
        self.directory.insert(self.team, user, role);
        user
    }

    /// `projectId=..&teamId=..`
    pub fn scope_query(&self) -> String {
        format!("projectId={}&teamId={}", self.project, self.team)
    }

    /// Make a request against the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        user: Option<Uuid>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }
}
