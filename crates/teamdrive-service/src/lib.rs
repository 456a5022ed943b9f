//! # teamdrive-service
//!
//! Use cases of the storage tree. Each service orchestrates the node store,
//! blob store, team directory and event publisher to implement one group
//! of operations.
//!
//! Services follow constructor injection: all collaborators are provided
//! at construction time as `Arc<dyn Trait>` values, usually through
//! [`ServiceContainer`].

pub mod container;
pub mod context;
pub mod events;
pub mod file;
pub mod folder;
pub mod scope;
pub mod settings;
pub mod tree;

pub use container::{Collaborators, ServiceContainer};
pub use context::RequestContext;
pub use file::{BulkService, DownloadService, FileService, ListingService, UploadService};
pub use folder::FolderService;
pub use settings::ServiceSettings;
pub use tree::TreeWalker;
