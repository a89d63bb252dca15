use bytes::Bytes;
use carousel_manager::intake::{self, IncomingFile, IntakeError};
use carousel_manager::object_store::{LocalStore, ObjectStore};
use carousel_manager::render::{self, PublicView};
use carousel_manager::storage::models::MediaKind;
use carousel_manager::storage::{CarouselStore, MemoryBackend};

fn setup() -> (tempfile::TempDir, CarouselStore, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let objects = LocalStore::new(dir.path().join("uploads")).unwrap();
    (dir, CarouselStore::new(MemoryBackend::new()), objects)
}

fn file(name: &str, mime: &str) -> IncomingFile {
    IncomingFile {
        original_name: Some(name.to_string()),
        content_type: Some(mime.to_string()),
        data: Bytes::from_static(b"\x89PNG fake"),
    }
}

#[tokio::test]
async fn test_ingest_then_render() {
    let (_dir, store, objects) = setup();

    let item = intake::ingest(&store, &objects, Some(file("a b.jpg", "image/jpeg")), "Hi")
        .await
        .unwrap();

    assert!(item.url.starts_with("/uploads/"));
    assert!(!item.url.chars().any(char::is_whitespace));
    assert!(item.url.ends_with("a_b.jpg"));
    assert_eq!(item.media_kind(), MediaKind::Image);
    assert_eq!(item.caption, "Hi");
    assert!(objects.exists(item.stored_name()).await.unwrap());

    let sequence = store.load().unwrap();
    assert_eq!(sequence, vec![item.clone()]);

    let PublicView::Carousel(carousel) = render::render_public(&sequence) else {
        panic!("expected a non-empty carousel");
    };
    assert_eq!(carousel.len(), 1);
    assert!(carousel.slides[0].active);
    assert_eq!(carousel.slides[0].url, item.url);
}

#[tokio::test]
async fn test_ingest_video() {
    let (_dir, store, objects) = setup();
    let item = intake::ingest(&store, &objects, Some(file("clip.mp4", "video/mp4")), "")
        .await
        .unwrap();
    assert_eq!(item.media_kind(), MediaKind::Video);
    assert_eq!(item.mime_type, "video/mp4");
}

#[tokio::test]
async fn test_ingest_rejects_non_media_before_storing() {
    let (dir, store, objects) = setup();

    let result = intake::ingest(
        &store,
        &objects,
        Some(file("doc.pdf", "application/pdf")),
        "nope",
    )
    .await;

    assert!(matches!(result, Err(IntakeError::InvalidMediaKind(_))));
    assert!(store.load().unwrap().is_empty());
    let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_ingest_without_file() {
    let (_dir, store, objects) = setup();
    let result = intake::ingest(&store, &objects, None, "caption").await;
    assert!(matches!(result, Err(IntakeError::MissingUpload)));
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_ingest_rejects_undeclared_type_despite_media_filename() {
    let (dir, store, objects) = setup();

    for content_type in [Some("application/octet-stream"), None] {
        let upload = IncomingFile {
            original_name: Some("payload.png".to_string()),
            content_type: content_type.map(str::to_string),
            data: Bytes::from_static(b"MZ\x90\x00"),
        };
        let result = intake::ingest(&store, &objects, Some(upload), "").await;
        assert!(
            matches!(result, Err(IntakeError::InvalidMediaKind(_))),
            "{content_type:?} should be rejected"
        );
    }

    assert!(store.load().unwrap().is_empty());
    let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_same_name_uploads_do_not_collide() {
    let (_dir, store, objects) = setup();
    let first = intake::ingest(&store, &objects, Some(file("x.png", "image/png")), "1")
        .await
        .unwrap();
    let second = intake::ingest(&store, &objects, Some(file("x.png", "image/png")), "2")
        .await
        .unwrap();
    assert_ne!(first.url, second.url);
    assert_eq!(store.load().unwrap().len(), 2);
}
