use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

// Headroom over the file itself for the caption and multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = usize::try_from(state.config.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // Public
        .route("/", get(handlers::public_index))
        .route("/uploads/*name", get(handlers::serve_upload))
        // Admin pages
        .route("/admin", get(handlers::admin_index).post(handlers::login))
        .route("/admin/logout", post(handlers::logout))
        // Admin API
        .route("/admin/items", get(handlers::list_items))
        .route(
            "/admin/upload",
            post(handlers::upload_item).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/remove", post(handlers::remove_item))
        .route("/admin/move", post(handlers::move_item))
        .route("/admin/caption", post(handlers::update_caption))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
