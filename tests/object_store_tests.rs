use bytes::Bytes;
use carousel_manager::object_store::{LocalStore, ObjectStore, ObjectStoreError};

#[tokio::test]
async fn test_local_store_put_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let data = Bytes::from("fake png bytes");
    store.put("1700000000000-ab12cd34-a.png", data.clone()).await.unwrap();

    let retrieved = store.get("1700000000000-ab12cd34-a.png").await.unwrap();
    assert_eq!(retrieved, data);
    assert!(dir.path().join("1700000000000-ab12cd34-a.png").exists());
}

#[tokio::test]
async fn test_local_store_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    store.put("clip.mp4", Bytes::from("data")).await.unwrap();
    assert!(store.exists("clip.mp4").await.unwrap());

    store.delete("clip.mp4").await.unwrap();
    assert!(!store.exists("clip.mp4").await.unwrap());

    // Deleting again is not an error
    store.delete("clip.mp4").await.unwrap();
}

#[tokio::test]
async fn test_local_store_get_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let result = store.get("missing.png").await;
    assert!(matches!(result, Err(ObjectStoreError::NotFound(_))));
}

#[tokio::test]
async fn test_local_store_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    let store = LocalStore::new(&uploads).unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

    for key in ["../secret.txt", "..", "", ".env", "nested/file.png"] {
        assert!(
            matches!(store.get(key).await, Err(ObjectStoreError::InvalidKey(_))),
            "key {key:?} should be rejected"
        );
    }
    assert!(matches!(
        store.put("../escape.png", Bytes::from("x")).await,
        Err(ObjectStoreError::InvalidKey(_))
    ));
    assert!(!dir.path().join("escape.png").exists());
}
