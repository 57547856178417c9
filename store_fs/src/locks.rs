//! Per-file write locks.

use starter_types::StarterKind;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per starter file.
///
/// Writes to different files proceed independently; writes to the same file
/// (a manual regenerate racing a reconciliation pass) are serialized.
#[derive(Default)]
pub struct FileLocks {
    locks: Mutex<HashMap<StarterKind, Arc<Mutex<()>>>>,
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for `kind`.
    pub fn for_kind(&self, kind: StarterKind) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(kind)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the lock for `kind`.
    pub fn with<R>(&self, kind: StarterKind, f: impl FnOnce() -> R) -> R {
        let lock = self.for_kind(kind);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
