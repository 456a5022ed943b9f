//! Route definitions for the TeamDrive HTTP API.
//!
//! All routes are mounted under `/api`. Static segments such as
//! `/files/bulk` take precedence over `/files/{id}`.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(file_routes())
        .merge(folder_routes())
        .merge(webhook_routes())
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Listing, uploads, mutation and downloads
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::files::list_files))
        .route(
            "/files/initiate-upload",
            post(handlers::files::initiate_upload),
        )
        .route(
            "/files/bulk",
            patch(handlers::files::bulk_update).delete(handlers::files::bulk_delete),
        )
        .route("/files/lookup", post(handlers::files::lookup))
        .route("/files/download", post(handlers::files::download))
        .route(
            "/files/{id}",
            patch(handlers::files::update_file).delete(handlers::files::delete_file),
        )
        .route(
            "/files/{id}/initiate-update",
            post(handlers::files::initiate_update),
        )
        .route("/files/{id}/confirm", post(handlers::files::confirm_upload))
        .route("/files/{id}/preview", get(handlers::files::preview_file))
}

/// Folder creation and browsing
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folders::create_folder))
        .route("/folders/{id}", get(handlers::folders::get_folder))
}

/// Blob store notifications
fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/webhooks/storage",
        post(handlers::webhooks::storage_notification),
    )
}
