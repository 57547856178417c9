//! Shared utilities for wallet starters.

pub mod data_dir;
pub mod logging;

pub use data_dir::{default_data_dir, DataDirError, APP_NAME};
pub use logging::{init_logging, LogFormat};
