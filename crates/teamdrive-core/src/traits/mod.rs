//! Collaborator traits defined in `teamdrive-core` and implemented by other crates.

pub mod blob;
pub mod events;

pub use blob::{BlobObjectMeta, BlobStore, Disposition};
pub use events::EventPublisher;
