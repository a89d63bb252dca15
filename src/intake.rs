//! Upload intake: turns an uploaded file plus caption into a stored blob and
//! a new carousel item.

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::{CarouselItem, MediaKind, MAX_CAPTION_CHARS};
use crate::storage::{CarouselStore, StoreError};

/// Public url prefix under which stored media is served.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Only images and videos are allowed (got '{0}')")]
    InvalidMediaKind(String),
    #[error("No file was uploaded")]
    MissingUpload,
    #[error("Failed to store media: {0}")]
    ObjectStore(#[from] ObjectStoreError),
    #[error("Failed to update carousel: {0}")]
    Store(#[from] StoreError),
}

/// A file as decoded from the multipart body.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl IncomingFile {
    /// The type the client declared for the part; `""` when none was sent.
    pub fn declared_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or_default()
    }
}

/// Accept only declared types starting with `image/` or `video/`.
/// The filename and the bytes are never consulted.
pub fn validate(mime_type: &str) -> Result<MediaKind, IntakeError> {
    MediaKind::from_declared(mime_type)
        .ok_or_else(|| IntakeError::InvalidMediaKind(mime_type.into()))
}

/// Stored filename for an upload: `<unix millis>-<random hex>-<cleaned name>`.
///
/// The millisecond prefix keeps names roughly chronological; the random
/// segment separates uploads landing in the same millisecond.
pub fn name_for(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("{millis}-{}-{}", &nonce[..8], clean_filename(original_name))
}

/// Replace whitespace runs and filesystem-unsafe characters with `_`.
fn clean_filename(original_name: &str) -> String {
    // Browsers on some platforms send the full client path
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let mut cleaned = String::with_capacity(base.len());
    let mut in_gap = false;
    for c in base.chars() {
        let unsafe_char = c.is_whitespace()
            || c.is_control()
            || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' | '#');
        if unsafe_char {
            if !in_gap {
                cleaned.push('_');
            }
            in_gap = c.is_whitespace();
        } else {
            cleaned.push(c);
            in_gap = false;
        }
    }

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Cut a caption down to the UI limit, on a character boundary.
pub fn clamp_caption(caption: &str) -> String {
    caption.chars().take(MAX_CAPTION_CHARS).collect()
}

/// Validate, store and append an upload.
///
/// The MIME check runs before any bytes are written. If appending to the
/// carousel fails the freshly written blob is removed again.
pub async fn ingest(
    store: &CarouselStore,
    objects: &dyn ObjectStore,
    upload: Option<IncomingFile>,
    caption: &str,
) -> Result<CarouselItem, IntakeError> {
    let upload = upload.ok_or(IntakeError::MissingUpload)?;
    let mime_type = upload.declared_type().to_string();
    let kind = validate(&mime_type)?;

    let stored_name = name_for(upload.original_name.as_deref().unwrap_or_default());
    objects.put(&stored_name, upload.data).await?;

    let item = CarouselItem::new(
        format!("{UPLOADS_ROUTE}/{stored_name}"),
        mime_type,
        caption,
    );

    if let Err(e) = store.append(item.clone()) {
        if let Err(cleanup) = objects.delete(&stored_name).await {
            tracing::warn!(stored_name = %stored_name, error = %cleanup, "Failed to remove orphaned upload");
        }
        return Err(e.into());
    }

    tracing::info!(url = %item.url, kind = kind.as_str(), "Added carousel item");
    Ok(item)
}
