//! Nullable infrastructure for deterministic testing.
//!
//! The external dependencies of starter management (storage, the installed
//! node binaries, randomness) sit behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod installations;
pub mod random;
pub mod store;

pub use installations::NullInstallations;
pub use random::NullEntropy;
pub use store::NullStarterStore;
