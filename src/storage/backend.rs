use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::StoreError;

/// Where the serialized carousel sequence lives.
///
/// Backends only move opaque bytes; encoding and the tolerant decoding
/// policy belong to [`super::CarouselStore`]. `save` must replace the
/// previous state atomically so a concurrent `load` sees either the old or
/// the new sequence, never a mix.
pub trait StateBackend: Send + Sync {
    /// Returns `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// A single JSON document on disk.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub const FILE_NAME: &'static str = "carousel_data.json";

    /// Keep the state file at `<data_dir>/carousel_data.json`.
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        Ok(Self {
            path: data_dir.as_ref().join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StateBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        // Write-then-rename so readers never observe a truncated file
        let temp = self.temp_path();
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing raw state, e.g. deliberately corrupt bytes.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
        }
    }

    pub fn raw(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.raw())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::in_dir(dir.path()).unwrap();
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_save_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::in_dir(dir.path().join("nested")).unwrap();

        backend.save(b"[1]").unwrap();
        backend.save(b"[2]").unwrap();

        assert_eq!(backend.load().unwrap().as_deref(), Some(&b"[2]"[..]));
        assert!(!backend.temp_path().exists());
        assert!(backend.path().ends_with(JsonFileBackend::FILE_NAME));
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_none());
        backend.save(b"abc").unwrap();
        assert_eq!(backend.raw().as_deref(), Some(&b"abc"[..]));
    }
}
