//! Chain configuration as supplied by the node catalogue.

use serde::{Deserialize, Serialize};

use crate::TypeError;

/// Whether a chain is the base layer or a sidechain on top of it.
///
/// Serialised as the bare integer `1` or `2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChainLayer {
    L1,
    L2,
}

impl TryFrom<u8> for ChainLayer {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::L1),
            2 => Ok(Self::L2),
            other => Err(TypeError::InvalidChainLayer(other)),
        }
    }
}

impl From<ChainLayer> for u8 {
    fn from(layer: ChainLayer) -> u8 {
        match layer {
            ChainLayer::L1 => 1,
            ChainLayer::L2 => 2,
        }
    }
}

/// The node binary's file name, either shared across platforms or per platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinaryName {
    Single(String),
    PerPlatform {
        linux: String,
        macos: String,
        windows: String,
    },
}

impl BinaryName {
    /// File name to look for on the platform this process runs on.
    pub fn for_current_platform(&self) -> &str {
        match self {
            Self::Single(name) => name,
            Self::PerPlatform {
                linux,
                macos,
                windows,
            } => {
                if cfg!(target_os = "windows") {
                    windows
                } else if cfg!(target_os = "macos") {
                    macos
                } else {
                    linux
                }
            }
        }
    }
}

/// One entry of the chain catalogue.
///
/// Reconciliation only reads `name`, `chain_layer` and `sidechain_slot`;
/// `binary` is handed to the installation check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_layer: ChainLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidechain_slot: Option<u8>,
    pub binary: BinaryName,
}

impl ChainConfig {
    pub fn layer1(name: impl Into<String>, binary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_layer: ChainLayer::L1,
            sidechain_slot: None,
            binary: BinaryName::Single(binary.into()),
        }
    }

    pub fn sidechain(name: impl Into<String>, slot: u8, binary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_layer: ChainLayer::L2,
            sidechain_slot: Some(slot),
            binary: BinaryName::Single(binary.into()),
        }
    }

    pub fn is_layer1(&self) -> bool {
        self.chain_layer == ChainLayer::L1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_serialises_as_integer() {
        assert_eq!(serde_json::to_string(&ChainLayer::L2).unwrap(), "2");
        let layer: ChainLayer = serde_json::from_str("1").unwrap();
        assert_eq!(layer, ChainLayer::L1);
        assert!(serde_json::from_str::<ChainLayer>("3").is_err());
    }

    #[test]
    fn binary_name_accepts_string_or_table() {
        let single: BinaryName = serde_json::from_str("\"thunder\"").unwrap();
        assert_eq!(single.for_current_platform(), "thunder");

        let table: BinaryName = serde_json::from_str(
            r#"{"linux":"bitnames-linux","macos":"bitnames-mac","windows":"bitnames.exe"}"#,
        )
        .unwrap();
        let expected = if cfg!(target_os = "windows") {
            "bitnames.exe"
        } else if cfg!(target_os = "macos") {
            "bitnames-mac"
        } else {
            "bitnames-linux"
        };
        assert_eq!(table.for_current_platform(), expected);
    }

    #[test]
    fn constructors_set_layer() {
        assert!(ChainConfig::layer1("Bitcoin Core (Patched)", "bitcoind").is_layer1());
        let thunder = ChainConfig::sidechain("Thunder", 9, "thunder");
        assert!(!thunder.is_layer1());
        assert_eq!(thunder.sidechain_slot, Some(9));
    }
}
