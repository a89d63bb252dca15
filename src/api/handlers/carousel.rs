use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::api::AdminSession;
use crate::intake::{self, IncomingFile};
use crate::storage::models::{CarouselItem, MediaKind};
use crate::storage::{Outcome, Removed};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

/// Item as returned to the admin client. JSON bodies carry the raw caption;
/// escaping happens when a page embeds it.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub caption: String,
    pub kind: MediaKind,
    pub mime_type: String,
    pub position: usize,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// False when the index was out of range and nothing changed.
    pub applied: bool,
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub item: ItemResponse,
    pub items: Vec<ItemResponse>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub i: i64,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub i: i64,
    pub d: i64,
}

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    pub i: i64,
    #[serde(default)]
    pub caption: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_items(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<ItemResponse>>>, ApiError> {
    Ok(JSend::success(current_items(&state)?))
}

pub async fn upload_item(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<JSend<UploadResponse>>, ApiError> {
    let mut upload: Option<IncomingFile> = None;
    let mut caption = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "media" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                // Browsers send an empty, unnamed part when no file was picked
                if data.is_empty() && original_name.as_deref().unwrap_or("").is_empty() {
                    continue;
                }

                upload = Some(IncomingFile {
                    original_name,
                    content_type,
                    data,
                });
            }
            "caption" => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid caption: {e}")))?;
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let caption = intake::clamp_caption(&caption);
    let item = intake::ingest(
        &state.store,
        state.object_store.as_ref(),
        upload,
        &caption,
    )
    .await?;

    let items = current_items(&state)?;
    let position = items.len().saturating_sub(1);
    Ok(JSend::success(UploadResponse {
        item: item_response(position, &item),
        items,
    }))
}

pub async fn remove_item(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RemoveRequest>,
) -> Result<Json<JSend<MutationResponse>>, ApiError> {
    let outcome = match position(req.i) {
        Some(index) => state.store.remove_at(index)?,
        None => Outcome::OutOfRange,
    };

    let applied = outcome.is_applied();
    if let Some(removed) = outcome.applied() {
        release_media(&state, &removed).await;
        tracing::info!(url = %removed.item.url, index = req.i, "Removed carousel item");
    } else {
        tracing::debug!(index = req.i, "Remove ignored, index out of range");
    }

    mutation_response(&state, applied)
}

pub async fn move_item(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<MoveRequest>,
) -> Result<Json<JSend<MutationResponse>>, ApiError> {
    let outcome = match position(req.i) {
        Some(index) => state.store.swap_adjacent(index, req.d)?,
        None => Outcome::OutOfRange,
    };

    tracing::debug!(index = req.i, delta = req.d, applied = outcome.is_applied(), "Move item");
    mutation_response(&state, outcome.is_applied())
}

pub async fn update_caption(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CaptionRequest>,
) -> Result<Json<JSend<MutationResponse>>, ApiError> {
    let caption = intake::clamp_caption(req.caption.as_deref().unwrap_or_default());
    let outcome = match position(req.i) {
        Some(index) => state.store.set_caption(index, caption)?,
        None => Outcome::OutOfRange,
    };

    tracing::debug!(index = req.i, applied = outcome.is_applied(), "Update caption");
    mutation_response(&state, outcome.is_applied())
}

// ============================================================================
// Helpers
// ============================================================================

/// Negative indices can never address an item.
fn position(i: i64) -> Option<usize> {
    usize::try_from(i).ok()
}

/// Delete the media file behind a removed item, unless another entry still
/// points at the same url. Failures are logged, not surfaced: the item is
/// already gone from the carousel.
async fn release_media(state: &AppState, removed: &Removed) {
    if removed.still_referenced {
        return;
    }
    let item = &removed.item;
    if let Err(e) = state.object_store.delete(item.stored_name()).await {
        tracing::warn!(url = %item.url, error = %e, "Failed to delete media file");
    }
}

fn item_response(position: usize, item: &CarouselItem) -> ItemResponse {
    ItemResponse {
        caption: item.caption.clone(),
        kind: item.media_kind(),
        mime_type: item.mime_type.clone(),
        position,
        url: item.url.clone(),
    }
}

fn current_items(state: &AppState) -> Result<Vec<ItemResponse>, ApiError> {
    Ok(state
        .store
        .load()?
        .iter()
        .enumerate()
        .map(|(position, item)| item_response(position, item))
        .collect())
}

fn mutation_response(
    state: &AppState,
    applied: bool,
) -> Result<Json<JSend<MutationResponse>>, ApiError> {
    Ok(JSend::success(MutationResponse {
        applied,
        items: current_items(state)?,
    }))
}
