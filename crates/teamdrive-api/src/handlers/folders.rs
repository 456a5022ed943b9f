//! Folder handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use teamdrive_entity::Node;
use teamdrive_service::file::requests::CreateFolderRequest;
use teamdrive_service::folder::FolderContents;

use crate::dto::request::FolderQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Node>), ApiError> {
    let folder = state.services.folders.create_folder(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /api/folders/{id}?projectId=&teamId=&page=&limit=
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<FolderQuery>,
) -> Result<Json<FolderContents>, ApiError> {
    let contents = state
        .services
        .folders
        .get_folder(&auth, id, query.scope(), query.page_request())
        .await?;
    Ok(Json(contents))
}
