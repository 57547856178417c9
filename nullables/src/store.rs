//! Nullable store: thread-safe in-memory starter storage for testing.

use starter_store::{EventBus, StarterStore, StoreError, StoreEvent};
use starter_types::{StarterKind, StarterRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

/// An in-memory starter store for testing.
///
/// Records are kept as the same pretty JSON the file store writes, so tests
/// can compare snapshots byte for byte. Individual kinds can be made to fail
/// their post-write verification.
#[derive(Default)]
pub struct NullStarterStore {
    files: Mutex<BTreeMap<StarterKind, String>>,
    failing: Mutex<BTreeSet<StarterKind>>,
    writes: Mutex<Vec<StarterKind>>,
    events: EventBus,
}

impl NullStarterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a record without emitting events or counting a write.
    pub fn with_record(self, kind: StarterKind, record: &StarterRecord) -> Self {
        let json = serde_json::to_string_pretty(record).unwrap();
        self.files.lock().unwrap().insert(kind, json);
        self
    }

    /// Make every later write of `kind` fail verification.
    pub fn fail_writes_for(&self, kind: StarterKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    /// The stored JSON per kind.
    pub fn snapshot(&self) -> BTreeMap<StarterKind, String> {
        self.files.lock().unwrap().clone()
    }

    /// Every successful or attempted write, in order.
    pub fn writes(&self) -> Vec<StarterKind> {
        self.writes.lock().unwrap().clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

impl StarterStore for NullStarterStore {
    fn load(&self, kind: StarterKind) -> Result<Option<StarterRecord>, StoreError> {
        match self.files.lock().unwrap().get(&kind) {
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| StoreError::Corrupted {
                    path: PathBuf::from(kind.file_name()),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn write(&self, kind: StarterKind, record: &StarterRecord) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(kind);
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(StoreError::PersistenceVerificationFailed(PathBuf::from(
                kind.file_name(),
            )));
        }
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.files.lock().unwrap().insert(kind, json);
        self.events.emit(&StoreEvent::Saved(kind));
        Ok(())
    }

    fn delete(&self, kind: StarterKind) -> Result<bool, StoreError> {
        let removed = self.files.lock().unwrap().remove(&kind).is_some();
        if removed {
            self.events.emit(&StoreEvent::Deleted(kind));
        }
        Ok(removed)
    }

    fn kinds(&self) -> Result<Vec<StarterKind>, StoreError> {
        Ok(self.files.lock().unwrap().keys().copied().collect())
    }
}
