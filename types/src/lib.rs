//! Fundamental types for wallet starters.
//!
//! This crate defines the data shared across every other crate in the workspace:
//! the persisted starter record, the starter kinds and their file names, the
//! chain configuration read by reconciliation, the binary-installation gate,
//! and the network selector.

pub mod chain;
pub mod error;
pub mod installation;
pub mod kind;
pub mod network;
pub mod record;

pub use chain::{BinaryName, ChainConfig, ChainLayer};
pub use error::TypeError;
pub use installation::BinaryInstallations;
pub use kind::{StarterKind, L1_DERIVATION_INDEX};
pub use network::Network;
pub use record::StarterRecord;
