//! Nullable installations: a scripted set of installed binaries.

use starter_types::BinaryInstallations;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Installed binaries are whatever the test says they are.
#[derive(Default)]
pub struct NullInstallations {
    installed: Mutex<BTreeSet<String>>,
    queries: Mutex<Vec<String>>,
}

impl NullInstallations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installed<I, S>(binaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let installations = Self::new();
        for binary in binaries {
            installations.install(binary);
        }
        installations
    }

    pub fn install(&self, binary: impl Into<String>) {
        self.installed.lock().unwrap().insert(binary.into());
    }

    pub fn uninstall(&self, binary: &str) {
        self.installed.lock().unwrap().remove(binary);
    }

    /// Every binary name asked about, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl BinaryInstallations for NullInstallations {
    fn is_installed(&self, binary: &str) -> bool {
        self.queries.lock().unwrap().push(binary.to_string());
        self.installed.lock().unwrap().contains(binary)
    }
}
