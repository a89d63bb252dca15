use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::{ApiError, JSend};
use crate::storage::StateStatus;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: StateStatus,
    pub version: String,
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<HealthResponse>>, ApiError> {
    let store = state.store.status()?;
    if store == StateStatus::Corrupt {
        tracing::warn!(backend = %state.store.describe(), "Health check found corrupt carousel state");
    }

    Ok(JSend::success(HealthResponse {
        status: "ok".to_string(),
        store,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
