//! JSON file storage backend for wallet starters.
//!
//! Implements [`starter_store::StarterStore`] with one pretty-printed JSON
//! file per starter under `<data_dir>/wallet_starters/`:
//!
//! - `master_starter.json`
//! - `l1_starter.json`
//! - `sidechain_<slot>_starter.json`

pub mod file_store;
pub mod locks;

pub use file_store::{FileStarterStore, STARTERS_DIR};
pub use locks::FileLocks;
