use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::auth;
use crate::AppState;

/// Proof that the request carries a live admin session.
///
/// Handlers that mutate the carousel take this extractor, so they are
/// unreachable without passing the admin gate.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, ApiError> {
        match auth::session_token(&parts.headers) {
            Some(token) if state.sessions.is_valid(&token) => Ok(AdminSession { token }),
            _ => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}
