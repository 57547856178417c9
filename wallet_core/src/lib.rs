//! Wallet starter core.
//!
//! Provides everything a wallet front end needs to manage starters:
//! - Master creation and import (BIP39 + BIP32)
//! - Opaque rederivation of layer-1 and sidechain starters
//! - Reconciliation against installed chain binaries
//! - Password-encrypted backup of the master mnemonic
//! - TOML configuration

pub mod config;
pub mod error;
pub mod installations;
pub mod keystore;
pub mod reconcile;
pub mod service;

pub use config::{ConfigError, StarterConfig};
pub use error::WalletError;
pub use installations::{installed_chains, InstallDirectory};
pub use keystore::{decrypt_mnemonic, encrypt_mnemonic, load_keystore, save_keystore, KeystoreFile};
pub use reconcile::{ChainOutcome, ReconcileReport, ReconciliationRunner};
pub use service::{StarterService, MASTER_STARTER_NAME};
