//! Platform data directory resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Directory name used under the platform's application-data root.
pub const APP_NAME: &str = "wallet-starters";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataDirError {
    #[error("cannot determine the platform data directory")]
    Unavailable,
}

/// The application's data directory for this platform:
///
/// - Linux: `$XDG_DATA_HOME/<app>` or `~/.local/share/<app>`
/// - macOS: `~/Library/Application Support/<app>`
/// - Windows: `%APPDATA%\<app>`
///
/// The directory is not created.
pub fn default_data_dir() -> Result<PathBuf, DataDirError> {
    app_dir(dirs::data_dir())
}

fn app_dir(base: Option<PathBuf>) -> Result<PathBuf, DataDirError> {
    base.map(|dir| dir.join(APP_NAME))
        .ok_or(DataDirError::Unavailable)
}
