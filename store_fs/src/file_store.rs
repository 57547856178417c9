//! File-backed starter store.

use starter_store::{EventBus, StarterStore, StoreError, StoreEvent};
use starter_types::{StarterKind, StarterRecord};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::locks::FileLocks;

/// Subdirectory of the application data directory holding starter files.
pub const STARTERS_DIR: &str = "wallet_starters";

/// Starter store writing one JSON file per starter.
///
/// Constructed with the application's data directory and passed to whoever
/// needs it; there is no process-wide instance.
pub struct FileStarterStore {
    dir: PathBuf,
    locks: FileLocks,
    events: EventBus,
}

impl FileStarterStore {
    /// Store rooted at `<data_dir>/wallet_starters`. Nothing is created until
    /// the first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(STARTERS_DIR),
            locks: FileLocks::new(),
            events: EventBus::new(),
        }
    }

    /// Directory holding the starter files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: StarterKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Observers notified after every completed save or delete.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        replace_file(&self.dir, path, |file| file.write_all(contents))
    }

    /// Re-read the target and confirm it holds what was written.
    fn verify_written(&self, path: &Path, expected: &[u8]) -> Result<(), StoreError> {
        match fs::read(path) {
            Ok(actual) if actual == expected => Ok(()),
            Ok(_) => {
                tracing::error!(path = %path.display(), "starter file content differs after write");
                Err(StoreError::PersistenceVerificationFailed(path.to_path_buf()))
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "starter file missing after write");
                Err(StoreError::PersistenceVerificationFailed(path.to_path_buf()))
            }
        }
    }
}

/// Write a sibling temp file, sync it, then rename it over `path`.
///
/// A failure at any step leaves the previous contents of `path` untouched;
/// the temp file is removed when dropped.
fn replace_file(
    dir: &Path,
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> io::Result<()>,
) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    // Created owner-only (0600) on unix.
    let mut tmp = tempfile::Builder::new()
        .prefix(".starter")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::io(dir, e))?;
    write(tmp.as_file_mut())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

impl StarterStore for FileStarterStore {
    fn load(&self, kind: StarterKind) -> Result<Option<StarterRecord>, StoreError> {
        let path = self.path_for(kind);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StoreError::Corrupted {
                path,
                reason: e.to_string(),
            })
    }

    fn write(&self, kind: StarterKind, record: &StarterRecord) -> Result<(), StoreError> {
        let path = self.path_for(kind);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.locks.with(kind, || {
            self.write_file(&path, json.as_bytes())?;
            self.verify_written(&path, json.as_bytes())
        })?;

        tracing::info!(%kind, name = %record.name, "saved wallet starter");
        self.events.emit(&StoreEvent::Saved(kind));
        Ok(())
    }

    fn delete(&self, kind: StarterKind) -> Result<bool, StoreError> {
        let path = self.path_for(kind);
        let removed = self.locks.with(kind, || match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        })?;

        if removed {
            tracing::info!(%kind, "deleted wallet starter");
            self.events.emit(&StoreEvent::Deleted(kind));
        } else {
            tracing::debug!(%kind, "no wallet starter to delete");
        }
        Ok(removed)
    }

    fn kinds(&self) -> Result<Vec<StarterKind>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut kinds = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name();
            match name.to_str().map(StarterKind::from_file_name) {
                Some(Ok(kind)) => kinds.push(kind),
                _ => tracing::trace!(file = ?name, "ignoring non-starter file"),
            }
        }
        kinds.sort();
        Ok(kinds)
    }

    fn exists(&self, kind: StarterKind) -> Result<bool, StoreError> {
        Ok(self.path_for(kind).is_file())
    }
}
