//! File services: uploads, listing, bulk mutation, downloads.

pub mod bulk;
pub mod download;
pub mod listing;
pub mod requests;
pub mod service;
pub mod upload;

pub use bulk::BulkService;
pub use download::{DownloadPlan, DownloadService, PresignedUrl, ZipPlan};
pub use listing::ListingService;
pub use service::FileService;
pub use upload::{BeginUploadResponse, UploadService};
