use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on caption length enforced at the HTTP boundary.
/// The store itself accepts captions of any length.
pub const MAX_CAPTION_CHARS: usize = 128;

/// Coarse classification of a carousel item derived from its MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type by its primary type. Only `image/*` and `video/*`
    /// are carousel media; everything else yields `None`.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let primary = mime_type.split('/').next().unwrap_or("");
        match primary.trim().to_ascii_lowercase().as_str() {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Classify a declared upload type. The string must literally start
    /// with `image/` or `video/`; anything looser is rejected.
    pub fn from_declared(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// One displayed media unit, persisted as `{"url", "type", "caption"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Raw, unsanitized caption as the operator typed it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub caption: String,
}

impl CarouselItem {
    pub fn new(
        url: impl Into<String>,
        mime_type: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            caption: caption.into(),
        }
    }

    /// Anything that is not an image renders as a video, which keeps
    /// records written with an unusual `type` displayable.
    pub fn media_kind(&self) -> MediaKind {
        match MediaKind::from_mime(&self.mime_type) {
            Some(MediaKind::Image) => MediaKind::Image,
            _ => MediaKind::Video,
        }
    }

    /// The object-store key backing this item: the last path segment of its url.
    pub fn stored_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

/// Ordered carousel content. Position in the vector is display order.
pub type CarouselSequence = Vec<CarouselItem>;

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("image/gif"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("IMAGE/JPEG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
        assert_eq!(MediaKind::from_mime(""), None);
        assert_eq!(MediaKind::from_mime("imagefoo"), None);
    }

    #[test]
    fn test_media_kind_from_declared() {
        assert_eq!(MediaKind::from_declared("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_declared("video/webm"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_declared("image"), None);
        assert_eq!(MediaKind::from_declared("video"), None);
        assert_eq!(MediaKind::from_declared(" image/png"), None);
        assert_eq!(MediaKind::from_declared("imagefoo/png"), None);
        assert_eq!(MediaKind::from_declared("application/octet-stream"), None);
        assert_eq!(MediaKind::from_declared(""), None);
    }

    #[test]
    fn test_item_decodes_legacy_record() {
        let json = r#"{"url":"/uploads/1-a.png","type":"image/png","caption":null}"#;
        let item: CarouselItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.caption, "");
        assert_eq!(item.media_kind(), MediaKind::Image);

        let json = r#"{"url":"/uploads/2-b.mp4","type":"video/mp4"}"#;
        let item: CarouselItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.caption, "");
        assert_eq!(item.media_kind(), MediaKind::Video);
    }

    #[test]
    fn test_item_encodes_type_field() {
        let item = CarouselItem::new("/uploads/x.png", "image/png", "hi");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "image/png");
        assert_eq!(value["url"], "/uploads/x.png");
        assert_eq!(value["caption"], "hi");
    }

    #[test]
    fn test_unknown_type_renders_as_video() {
        let item = CarouselItem::new("/uploads/x.bin", "application/octet-stream", "");
        assert_eq!(item.media_kind(), MediaKind::Video);
    }

    #[test]
    fn test_stored_name() {
        let item = CarouselItem::new("/uploads/123-abc-photo.png", "image/png", "");
        assert_eq!(item.stored_name(), "123-abc-photo.png");
    }
}
