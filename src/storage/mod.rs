//! The carousel store: a persisted, ordered list of [`CarouselItem`]s and
//! the index-addressed operations that mutate it.
//!
//! Every mutation is a full read-modify-write of the sequence, serialized by
//! a single writer lock. Reads go straight to the backend and rely on its
//! atomic replacement guarantee.

pub mod backend;
pub mod db;
pub mod models;
mod tables;

use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::config::{StateBackendKind, StorageConfig};

pub use backend::{JsonFileBackend, MemoryBackend, StateBackend};
pub use db::{Database, DatabaseError};
pub use models::{CarouselItem, CarouselSequence, MediaKind};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result of an index-addressed mutation.
///
/// Out-of-range indices are not errors: the sequence is left untouched and
/// the caller gets `OutOfRange` to report (or ignore) as it sees fit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T = ()> {
    Applied(T),
    OutOfRange,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(v) => Some(v),
            Outcome::OutOfRange => None,
        }
    }
}

/// An item taken out by [`CarouselStore::remove_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub item: CarouselItem,
    /// Another item left in the sequence points at the same url.
    pub still_referenced: bool,
}

/// What the backend currently holds. `load()` folds `Uninitialized` and
/// `Corrupt` into an empty sequence; this keeps them apart for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StateStatus {
    Uninitialized,
    Ready { items: usize },
    Corrupt,
}

enum Decoded {
    Missing,
    Parsed(CarouselSequence),
    Corrupt(serde_json::Error),
}

pub struct CarouselStore {
    backend: Box<dyn StateBackend>,
    write_lock: Mutex<()>,
}

impl CarouselStore {
    pub fn new(backend: impl StateBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn StateBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the backend selected in configuration.
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        let backend: Box<dyn StateBackend> = match config.backend {
            StateBackendKind::Json => Box::new(JsonFileBackend::in_dir(&config.data_dir)?),
            StateBackendKind::Redb => Box::new(Database::open(&config.data_dir)?),
        };
        Ok(Self::from_boxed(backend))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    fn decode(&self) -> Result<Decoded, StoreError> {
        let Some(bytes) = self.backend.load()? else {
            return Ok(Decoded::Missing);
        };
        match serde_json::from_slice::<CarouselSequence>(&bytes) {
            Ok(sequence) => Ok(Decoded::Parsed(sequence)),
            Err(e) => Ok(Decoded::Corrupt(e)),
        }
    }

    /// Read the current sequence.
    ///
    /// Missing or unparseable state yields an empty sequence so the public
    /// page keeps rendering; only backend I/O failures surface as errors.
    pub fn load(&self) -> Result<CarouselSequence, StoreError> {
        match self.decode()? {
            Decoded::Missing => Ok(Vec::new()),
            Decoded::Parsed(sequence) => Ok(sequence),
            Decoded::Corrupt(e) => {
                tracing::warn!(
                    backend = %self.backend.describe(),
                    error = %e,
                    "Persisted carousel state is corrupt, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn status(&self) -> Result<StateStatus, StoreError> {
        Ok(match self.decode()? {
            Decoded::Missing => StateStatus::Uninitialized,
            Decoded::Parsed(sequence) => StateStatus::Ready {
                items: sequence.len(),
            },
            Decoded::Corrupt(_) => StateStatus::Corrupt,
        })
    }

    fn persist(&self, sequence: &CarouselSequence) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(sequence)?;
        self.backend.save(&bytes)
    }

    /// Run one read-modify-write cycle under the writer lock. State is only
    /// written back when the change was applied.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut CarouselSequence) -> Outcome<T>,
    ) -> Result<Outcome<T>, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut sequence = self.load()?;
        let outcome = change(&mut sequence);
        if outcome.is_applied() {
            self.persist(&sequence)?;
        }
        Ok(outcome)
    }

    /// Add an item at the end. Returns the new length.
    pub fn append(&self, item: CarouselItem) -> Result<usize, StoreError> {
        let outcome = self.mutate(|sequence| {
            sequence.push(item);
            Outcome::Applied(sequence.len())
        })?;
        Ok(outcome.applied().unwrap_or_default())
    }

    /// Remove the item at `index`, handing it back so the caller can delete
    /// the media file it points at once nothing else references it.
    pub fn remove_at(&self, index: usize) -> Result<Outcome<Removed>, StoreError> {
        self.mutate(|sequence| {
            if index >= sequence.len() {
                return Outcome::OutOfRange;
            }
            let item = sequence.remove(index);
            let still_referenced = sequence.iter().any(|other| other.url == item.url);
            Outcome::Applied(Removed {
                item,
                still_referenced,
            })
        })
    }

    /// Swap the item at `index` with the one at `index + delta`. Both
    /// positions must exist.
    pub fn swap_adjacent(&self, index: usize, delta: i64) -> Result<Outcome, StoreError> {
        self.mutate(|sequence| match neighbour(sequence.len(), index, delta) {
            Some(other) => {
                sequence.swap(index, other);
                Outcome::Applied(())
            }
            None => Outcome::OutOfRange,
        })
    }

    pub fn set_caption(
        &self,
        index: usize,
        caption: impl Into<String>,
    ) -> Result<Outcome, StoreError> {
        let caption = caption.into();
        self.mutate(|sequence| match sequence.get_mut(index) {
            Some(item) => {
                item.caption = caption;
                Outcome::Applied(())
            }
            None => Outcome::OutOfRange,
        })
    }
}

fn neighbour(len: usize, index: usize, delta: i64) -> Option<usize> {
    if index >= len {
        return None;
    }
    let target = i64::try_from(index).ok()?.checked_add(delta)?;
    let target = usize::try_from(target).ok()?;
    (target < len).then_some(target)
}
