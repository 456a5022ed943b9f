//! Blob store event notifications.

use axum::Json;
use axum::extract::State;
use tracing::{debug, warn};

use teamdrive_core::error::ErrorKind;

use crate::dto::request::StorageNotification;
use crate::dto::response::WebhookResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/webhooks/storage
///
/// Finalizes the upload of every `ObjectCreated` record. Records for other
/// event types or for keys no file holds are skipped; any other failure
/// aborts the batch so the store retries it.
pub async fn storage_notification(
    State(state): State<AppState>,
    Json(notification): Json<StorageNotification>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let mut response = WebhookResponse::default();

    for record in &notification.records {
        if !record.is_object_created() {
            debug!(event = %record.event_name, "Ignoring storage event");
            response.skipped += 1;
            continue;
        }
        let Some(key) = record.decoded_key() else {
            warn!(key = %record.s3.object.key, "Undecodable object key");
            response.skipped += 1;
            continue;
        };

        match state.services.upload.complete_upload(&key).await {
            Ok(_) => response.processed += 1,
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(storage_key = %key, "Object created for unknown storage key");
                response.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(response))
}
