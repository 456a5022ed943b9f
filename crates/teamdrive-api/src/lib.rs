//! # teamdrive-api
//!
//! HTTP API layer for TeamDrive built on Axum.
//!
//! Every route lives under `/api`. Callers are authenticated by an upstream
//! gateway which forwards the acting user in the `x-user-id` header.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
