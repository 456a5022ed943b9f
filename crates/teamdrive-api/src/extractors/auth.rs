//! `AuthUser` extractor: reads the acting user forwarded by the gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use teamdrive_core::error::AppError;
use teamdrive_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extracted user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::bad_request(format!("Missing {USER_ID_HEADER} header")))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::bad_request(format!("Invalid {USER_ID_HEADER} header")))?;

        Ok(AuthUser(RequestContext::new(user_id)))
    }
}
