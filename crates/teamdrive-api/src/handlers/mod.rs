//! Request handlers for all API endpoints.

pub mod files;
pub mod folders;
pub mod health;
pub mod webhooks;
