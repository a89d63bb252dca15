//! Shared test helpers for handler-level tests.

use std::sync::Arc;

use crate::config::{AdminConfig, Config, ServerConfig, StorageConfig};
use crate::object_store::LocalStore;
use crate::storage::{CarouselStore, JsonFileBackend};
use crate::AppState;

pub const TEST_USER: &str = "operator";
pub const TEST_PASSWORD: &str = "correct horse";

/// Create a test AppState with a JSON state file and local media directory
/// under `temp_dir`.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let backend = JsonFileBackend::in_dir(&data_dir).expect("Failed to create test state dir");
    test_state_with(temp_dir, CarouselStore::new(backend))
}

/// Like [`test_state`], but over a caller-supplied carousel store.
pub fn test_state_with(temp_dir: &tempfile::TempDir, store: CarouselStore) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");
    let uploads_dir = temp_dir.path().join("uploads");

    let config = Config {
        admin: AdminConfig {
            username: TEST_USER.to_string(),
            password: TEST_PASSWORD.to_string(),
            ..AdminConfig::default()
        },
        server: ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
        },
        storage: StorageConfig {
            data_dir: data_dir.to_string_lossy().to_string(),
            uploads_dir: uploads_dir.to_string_lossy().to_string(),
            ..StorageConfig::default()
        },
        max_upload_size: 1024 * 1024, // 1MB for tests
    };

    let object_store = LocalStore::new(&uploads_dir).expect("Failed to create test object store");

    Arc::new(
        AppState::new(
            config,
            Arc::new(store),
            Arc::new(object_store),
        )
        .expect("Failed to build test state"),
    )
}

/// A live admin session for calling gated handlers directly.
pub fn admin_session(state: &AppState) -> crate::api::AdminSession {
    crate::api::AdminSession {
        token: state.sessions.create().expect("Failed to create session"),
    }
}
