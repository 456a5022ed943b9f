//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HealthResponse, StorageHealth};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let blobs = &state.services.blobs;
    let healthy = blobs.health_check().await.unwrap_or(false);
    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: StorageHealth {
            provider: blobs.provider_type().to_string(),
            healthy,
        },
    })
}
