//! Shared fixtures for service tests, wired on the in-memory adapters.

#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use teamdrive_auth::{MemoryTeamDirectory, RequestScope};
use teamdrive_database::{MemoryNodeStore, NodeStore};
use teamdrive_entity::{MemberRole, Node, Visibility};
use teamdrive_events::MemoryEventBus;
use teamdrive_service::file::requests::{BeginUploadRequest, CreateFolderRequest};
use teamdrive_service::{Collaborators, RequestContext, ServiceContainer, ServiceSettings};
use teamdrive_storage::MemoryBlobStore;

/// A fully wired service container plus handles on every fake.
pub struct Harness {
    pub services: ServiceContainer,
    pub nodes: Arc<MemoryNodeStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub directory: Arc<MemoryTeamDirectory>,
    pub bus: Arc<MemoryEventBus>,
    pub project: Uuid,
    pub team: Uuid,
}

impl Harness {
    pub fn new() -> Self {
        let nodes = Arc::new(MemoryNodeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let directory = Arc::new(MemoryTeamDirectory::new());
        let bus = Arc::new(MemoryEventBus::default());
        let services = ServiceContainer::new(
            Collaborators {
                nodes: nodes.clone(),
                blobs: blobs.clone(),
                directory: directory.clone(),
                events: bus.clone(),
            },
            ServiceSettings::default(),
        );
        Self {
            services,
            nodes,
            blobs,
            directory,
            bus,
            project: Uuid::new_v4(),
            team: Uuid::new_v4(),
        }
    }

    /// The shared scope of the harness project.
    pub fn shared(&self) -> RequestScope {
        RequestScope::shared(self.project, self.team)
    }

    /// Register a new user in the harness team.
    pub fn member(&self, role: MemberRole) -> RequestContext {
        let ctx = RequestContext::new(Uuid::new_v4());
        self.directory.insert(self.team, ctx.user_id, role);
        ctx
    }

    pub async fn folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
        visibility: Visibility,
        allowed_user_ids: Vec<Uuid>,
    ) -> Node {
        self.services
            .folders
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id,
                    visibility: Some(visibility),
                    allowed_user_ids: Some(allowed_user_ids),
                    scope: self.shared(),
                },
            )
            .await
            .expect("create folder")
    }

    /// Upload a file through both phases and return the final node.
    pub async fn file(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
        scope: RequestScope,
    ) -> Node {
        let started = self
            .services
            .upload
            .begin_upload(
                ctx,
                BeginUploadRequest {
                    original_name: name.to_string(),
                    parent_id,
                    scope,
                },
            )
            .await
            .expect("begin upload");
        self.blobs
            .put_object(&started.storage_key, 1024, Some("application/octet-stream"));
        self.services
            .upload
            .complete_upload(&started.storage_key)
            .await
            .expect("complete upload")
    }

    /// Overwrite access fields directly in the store.
    pub async fn set_access(&self, node: &Node, visibility: Visibility, allowed: Vec<Uuid>) -> Node {
        self.nodes
            .update_one(
                node.id,
                &teamdrive_entity::NodeUpdate {
                    visibility: Some(visibility),
                    allowed_user_ids: Some(allowed),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("node exists")
    }

    pub async fn get(&self, id: Uuid) -> Option<Node> {
        self.nodes.find_by_id(id).await.expect("find")
    }
}
