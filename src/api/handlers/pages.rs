use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::api::AdminSession;
use crate::auth;
use crate::render;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Route: GET /
pub async fn public_index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let sequence = state.store.load()?;
    let view = render::render_public(&sequence);
    Ok(Html(render::public_page(&view).into_string()))
}

/// Route: GET /admin. Without a session this is the login form.
pub async fn admin_index(
    session: Option<AdminSession>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    if session.is_none() {
        return Ok(Html(render::login_page(None).into_string()));
    }

    let sequence = state.store.load()?;
    let view = render::render_admin(&sequence);
    Ok(Html(render::admin_page(&view).into_string()))
}

/// Route: POST /admin
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if !state.credentials.verify(&form.username, &form.password) {
        tracing::warn!(username = %form.username, "Rejected admin login");
        let page = render::login_page(Some("Invalid username or password."));
        return Ok((StatusCode::UNAUTHORIZED, Html(page.into_string())).into_response());
    }

    let token = state
        .sessions
        .create()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    tracing::info!(username = %form.username, "Admin logged in");

    let cookie = auth::session_cookie(&token, state.sessions.ttl());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/admin"),
    )
        .into_response())
}

/// Route: POST /admin/logout
pub async fn logout(session: Option<AdminSession>, State(state): State<Arc<AppState>>) -> Response {
    if let Some(session) = session {
        state.sessions.revoke(&session.token);
        tracing::info!("Admin logged out");
    }

    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Redirect::to("/admin"),
    )
        .into_response()
}
