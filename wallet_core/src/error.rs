use starter_crypto::{KeyError, MnemonicError, RederiveError};
use starter_store::StoreError;
use starter_types::StarterKind;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no master starter exists; generate or import one first")]
    MissingMasterStarter,

    #[error("a master starter already exists")]
    MasterAlreadyExists,

    #[error("{kind} starter is inconsistent: {reason}")]
    InconsistentStarter { kind: StarterKind, reason: String },

    #[error("keystore error: {0}")]
    Keystore(String),

    #[error("{0}")]
    Other(String),
}

impl From<RederiveError> for WalletError {
    fn from(e: RederiveError) -> Self {
        match e {
            RederiveError::Key(e) => Self::Key(e),
            RederiveError::Mnemonic(e) => Self::Mnemonic(e),
            other @ RederiveError::NotDependent => Self::Other(other.to_string()),
        }
    }
}
