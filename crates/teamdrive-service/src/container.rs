//! Explicit service composition.

use std::sync::Arc;

use teamdrive_auth::{PermissionResolver, TeamDirectory};
use teamdrive_core::traits::EventPublisher;
use teamdrive_core::traits::blob::BlobStore;
use teamdrive_database::NodeStore;

use crate::events::EventEmitter;
use crate::file::{BulkService, DownloadService, FileService, ListingService, UploadService};
use crate::folder::FolderService;
use crate::settings::ServiceSettings;
use crate::tree::TreeWalker;

/// External capabilities the services are built on.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Node metadata store.
    pub nodes: Arc<dyn NodeStore>,
    /// Blob store for file contents.
    pub blobs: Arc<dyn BlobStore>,
    /// Team membership lookups.
    pub directory: Arc<dyn TeamDirectory>,
    /// Outbound event publisher.
    pub events: Arc<dyn EventPublisher>,
}

/// Every service, wired once at startup and cloned into handlers.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    // ── Shared ───────────────────────────────────────────────
    /// Permission resolver
    pub resolver: Arc<PermissionResolver>,
    /// Node metadata store
    pub nodes: Arc<dyn NodeStore>,
    /// Blob store
    pub blobs: Arc<dyn BlobStore>,

    // ── Use cases ────────────────────────────────────────────
    /// Uploads
    pub upload: UploadService,
    /// Listing and lookup
    pub listing: ListingService,
    /// Folders
    pub folders: FolderService,
    /// Bulk update and delete
    pub bulk: BulkService,
    /// Single-node mutations and status changes
    pub files: Arc<FileService>,
    /// Preview and download
    pub downloads: DownloadService,
}

impl ServiceContainer {
    /// Wire every service from its collaborators.
    pub fn new(collaborators: Collaborators, settings: ServiceSettings) -> Self {
        let Collaborators {
            nodes,
            blobs,
            directory,
            events,
        } = collaborators;

        let resolver = Arc::new(PermissionResolver::new(nodes.clone(), directory));
        let emitter = EventEmitter::new(events);
        let walker = TreeWalker::new(nodes.clone(), settings.tree_walk_concurrency);

        let upload = UploadService::new(
            nodes.clone(),
            blobs.clone(),
            resolver.clone(),
            emitter.clone(),
            settings.clone(),
        );
        let listing = ListingService::new(nodes.clone(), resolver.clone());
        let folders = FolderService::new(nodes.clone(), resolver.clone());
        let bulk = BulkService::new(
            nodes.clone(),
            blobs.clone(),
            resolver.clone(),
            walker.clone(),
            emitter,
        );
        let files = Arc::new(FileService::new(nodes.clone(), resolver.clone(), bulk.clone()));
        let downloads = DownloadService::new(blobs.clone(), resolver.clone(), walker, settings);

        Self {
            resolver,
            nodes,
            blobs,
            upload,
            listing,
            folders,
            bulk,
            files,
            downloads,
        }
    }
}
