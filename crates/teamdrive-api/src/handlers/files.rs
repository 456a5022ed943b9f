//! File listing, upload, mutation and download handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use teamdrive_core::types::pagination::PageResponse;
use teamdrive_entity::{Node, UpdateOutcome};
use teamdrive_service::file::requests::{
    BeginUpdateRequest, BeginUploadRequest, BulkDeleteRequest, BulkUpdateRequest,
    DownloadRequest, ListFilesRequest, LookupRequest, UpdateNodeRequest,
};
use teamdrive_service::file::{BeginUploadResponse, DownloadPlan, PresignedUrl};

use crate::dto::request::ScopeQuery;
use crate::dto::response::DeletedResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/files?parentId=&projectId=&teamId=&page=&limit=
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(req): Query<ListFilesRequest>,
) -> Result<Json<PageResponse<Node>>, ApiError> {
    let page = state.services.listing.list_files(&auth, req).await?;
    Ok(Json(page))
}

/// POST /api/files/initiate-upload
pub async fn initiate_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BeginUploadRequest>,
) -> Result<(StatusCode, Json<BeginUploadResponse>), ApiError> {
    let started = state.services.upload.begin_upload(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(started)))
}

/// POST /api/files/{id}/initiate-update
pub async fn initiate_update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<BeginUpdateRequest>,
) -> Result<Json<BeginUploadResponse>, ApiError> {
    let started = state.services.upload.begin_update(&auth, id, req).await?;
    Ok(Json(started))
}

/// POST /api/files/{id}/confirm?projectId=&teamId=
pub async fn confirm_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<Node>, ApiError> {
    let node = state
        .services
        .upload
        .confirm_upload(&auth, id, scope.into())
        .await?;
    Ok(Json(node))
}

/// PATCH /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNodeRequest>,
) -> Result<Json<Node>, ApiError> {
    let node = state.services.files.update_one(&auth, id, req).await?;
    Ok(Json(node))
}

/// PATCH /api/files/bulk
pub async fn bulk_update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = state.services.bulk.update_many(&auth, req).await?;
    Ok(Json(outcome))
}

/// DELETE /api/files/{id}?projectId=&teamId=
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted_ids = state
        .services
        .files
        .delete_one(&auth, id, scope.into())
        .await?;
    Ok(Json(DeletedResponse { deleted_ids }))
}

/// DELETE /api/files/bulk
pub async fn bulk_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted_ids = state.services.bulk.delete_many(&auth, req).await?;
    Ok(Json(DeletedResponse { deleted_ids }))
}

/// POST /api/files/lookup
pub async fn lookup(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LookupRequest>,
) -> Result<Json<Vec<Node>>, ApiError> {
    let nodes = state.services.listing.get_many_by_ids(&auth, req).await?;
    Ok(Json(nodes))
}

/// GET /api/files/{id}/preview?projectId=&teamId=
pub async fn preview_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<PresignedUrl>, ApiError> {
    let url = state
        .services
        .downloads
        .get_preview_url(&auth, id, scope.into())
        .await?;
    Ok(Json(url))
}

/// POST /api/files/download
///
/// Returns either a redirect URL or the zip plan for the caller's archive
/// streamer.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DownloadRequest>,
) -> Result<Json<DownloadPlan>, ApiError> {
    let plan = state.services.downloads.get_download_url(&auth, req).await?;
    Ok(Json(plan))
}
