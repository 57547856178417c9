//! Starter configuration with TOML file support.

use serde::{Deserialize, Serialize};
use starter_types::{ChainConfig, Network};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("sidechain slot {slot} is claimed by both {first:?} and {second:?}")]
    DuplicateSlot {
        slot: u8,
        first: String,
        second: String,
    },

    #[error("layer-1 chain {0:?} must not carry a sidechain slot")]
    Layer1WithSlot(String),
}

/// Configuration for the starter tool.
///
/// Can be loaded from a TOML file via [`StarterConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarterConfig {
    /// Application data directory; starters live in `wallet_starters/` below it.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding chain binaries. Defaults to `<data_dir>/bin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Network the extended keys are serialised for.
    #[serde(default)]
    pub network: Network,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between installation-directory polls in watch mode.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,

    /// Chain catalogue consulted by reconciliation.
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainConfig>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    starter_utils::default_data_dir().unwrap_or_else(|_| PathBuf::from("./starters_data"))
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_watch_interval_secs() -> u64 {
    30
}

fn default_chains() -> Vec<ChainConfig> {
    vec![
        ChainConfig::layer1("Bitcoin Core (Patched)", "bitcoind"),
        ChainConfig::sidechain("BitNames", 2, "bitnames"),
        ChainConfig::sidechain("zSide", 3, "zside"),
        ChainConfig::sidechain("Thunder", 9, "thunder"),
    ]
}

// ── Impl ───────────────────────────────────────────────────────────────

impl StarterConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Directory searched for chain binaries.
    pub fn install_dir(&self) -> PathBuf {
        self.install_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("bin"))
    }

    /// Reject catalogues reconciliation cannot act on unambiguously.
    ///
    /// Several layer-1 entries are fine; only the first installed one is used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut slots: BTreeMap<u8, &str> = BTreeMap::new();
        for chain in &self.chains {
            if chain.is_layer1() {
                if chain.sidechain_slot.is_some() {
                    return Err(ConfigError::Layer1WithSlot(chain.name.clone()));
                }
                continue;
            }
            if let Some(slot) = chain.sidechain_slot {
                if let Some(first) = slots.insert(slot, &chain.name) {
                    return Err(ConfigError::DuplicateSlot {
                        slot,
                        first: first.to_string(),
                        second: chain.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            install_dir: None,
            network: Network::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            watch_interval_secs: default_watch_interval_secs(),
            chains: default_chains(),
        }
    }
}
