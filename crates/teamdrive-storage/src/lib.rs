//! # teamdrive-storage
//!
//! [`BlobStore`](teamdrive_core::traits::BlobStore) implementations. The
//! service only consumes presign, stat and delete capabilities; file bytes
//! travel directly between clients and the object store.

pub mod providers;

pub use providers::MemoryBlobStore;
#[cfg(feature = "s3")]
pub use providers::S3BlobStore;
