//! Installation checks against a directory of chain binaries.

use starter_types::{BinaryInstallations, ChainConfig};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Treats a chain as installed when `<dir>/<binary>` is a regular file.
#[derive(Debug, Clone)]
pub struct InstallDirectory {
    dir: PathBuf,
}

impl InstallDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Names of the chains in `chains` whose binaries are currently present.
///
/// Watch mode compares successive snapshots to decide when to reconcile.
pub fn installed_chains(
    chains: &[ChainConfig],
    installations: &dyn BinaryInstallations,
) -> BTreeSet<String> {
    chains
        .iter()
        .filter(|chain| installations.is_installed(chain.binary.for_current_platform()))
        .map(|chain| chain.name.clone())
        .collect()
}

impl BinaryInstallations for InstallDirectory {
    fn is_installed(&self, binary: &str) -> bool {
        // A binary name must stay inside the install directory.
        if binary.is_empty() || Path::new(binary).components().count() != 1 {
            return false;
        }
        self.dir.join(binary).is_file()
    }
}
