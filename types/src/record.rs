//! The persisted wallet starter.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ChainLayer;

/// One chain's wallet starter: a mnemonic, its seed and the master extended
/// private key of the starter's own derivation tree.
///
/// `xprv` is always the master key of `seed_hex`. `parent_xprv` and
/// `derivation_path` record where a dependent starter came from; they are
/// informational only and must never be used to rebuild `xprv`.
///
/// Field order is the on-disk JSON order. Secret fields are wiped on drop and
/// never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct StarterRecord {
    pub name: String,
    pub mnemonic: String,
    pub seed_hex: String,
    pub xprv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_xprv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub chain_layer: Option<ChainLayer>,
}

impl StarterRecord {
    /// Name of the first required secret field that is empty, checked in the
    /// order `mnemonic`, `seed_hex`, `xprv`.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("mnemonic", &self.mnemonic),
            ("seed_hex", &self.seed_hex),
            ("xprv", &self.xprv),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// BIP84 receive descriptor a descriptor wallet can be initialised from.
    pub fn wpkh_descriptor(&self, coin_type: u32) -> String {
        format!("wpkh({}/84h/{}h/0h/0/*)", self.xprv, coin_type)
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }
}

impl fmt::Debug for StarterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarterRecord")
            .field("name", &self.name)
            .field("mnemonic", &"<redacted>")
            .field("seed_hex", &"<redacted>")
            .field("xprv", &"<redacted>")
            .field("parent_xprv", &self.parent_xprv.as_ref().map(|_| "<redacted>"))
            .field("derivation_path", &self.derivation_path)
            .field("chain_layer", &self.chain_layer)
            .finish()
    }
}
