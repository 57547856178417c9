//! Parse errors for the primitive types in this crate.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid chain layer: {0} (expected 1 or 2)")]
    InvalidChainLayer(u8),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("unrecognised starter file name: {0}")]
    UnknownStarterFile(String),
}
