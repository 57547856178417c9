//! BIP32 extended private keys over secp256k1.
//!
//! Wraps `bitcoin::bip32::Xpriv` so that keys never print their secret
//! material and so that path and serialisation failures map onto one error
//! type.

use bitcoin::bip32::{self, DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::NetworkKind;
use starter_types::Network;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

/// Smallest and largest seed accepted by BIP32, in bytes.
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;
const HARDENED_OFFSET: u64 = 1 << 31;
const MAX_DEPTH: usize = u8::MAX as usize;

/// Errors arising from HD key handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("invalid derivation path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("derivation overflow at {path:?}: {reason}")]
    DerivationOverflow { path: String, reason: String },

    #[error("invalid extended key serialization: {0}")]
    InvalidKeySerialization(String),

    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// A BIP32 extended private key (private key plus chain code).
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    xpriv: Xpriv,
}

impl ExtendedKey {
    /// Base58check serialisation (`xprv…` / `tprv…`).
    pub fn serialize(&self) -> String {
        self.xpriv.to_string()
    }

    /// The raw 32-byte secp256k1 secret.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.xpriv.private_key.secret_bytes())
    }

    pub fn depth(&self) -> u8 {
        self.xpriv.depth
    }

    pub fn is_master(&self) -> bool {
        self.xpriv.depth == 0
    }

    pub fn is_mainnet(&self) -> bool {
        self.xpriv.network == NetworkKind::Main
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.xpriv.depth)
            .field("child_number", &self.xpriv.child_number)
            .field("mainnet", &self.is_mainnet())
            .finish_non_exhaustive()
    }
}

/// Builds master keys from seeds and walks derivation paths.
pub struct HdKeyDeriver {
    secp: Secp256k1<All>,
    network: Network,
}

impl HdKeyDeriver {
    pub fn new(network: Network) -> Self {
        Self {
            secp: Secp256k1::new(),
            network,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn network_kind(&self) -> NetworkKind {
        if self.network.is_mainnet() {
            NetworkKind::Main
        } else {
            NetworkKind::Test
        }
    }

    /// Master key for a raw seed. Deterministic.
    pub fn master_from_seed(&self, seed: &[u8]) -> Result<ExtendedKey, KeyError> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(KeyError::InvalidSeed(format!(
                "seed must be {MIN_SEED_LEN}..={MAX_SEED_LEN} bytes, got {}",
                seed.len()
            )));
        }
        let xpriv = Xpriv::new_master(self.network_kind(), seed)
            .map_err(|e| KeyError::InvalidSeed(e.to_string()))?;
        Ok(ExtendedKey { xpriv })
    }

    /// Master key for a hex-encoded seed.
    pub fn master_from_seed_hex(&self, seed_hex: &str) -> Result<ExtendedKey, KeyError> {
        let seed = Zeroizing::new(
            hex::decode(seed_hex.trim())
                .map_err(|e| KeyError::InvalidSeed(format!("seed is not valid hex: {e}")))?,
        );
        self.master_from_seed(&seed)
    }

    /// Derive the descendant of `key` at `path`, relative to `key`.
    ///
    /// Accepts `m/44'/0'/2'` as well as the `h` hardened marker.
    pub fn derive_path(&self, key: &ExtendedKey, path: &str) -> Result<ExtendedKey, KeyError> {
        let parsed = parse_path(path)?;
        let steps = parsed.len();
        if key.depth() as usize + steps > MAX_DEPTH {
            return Err(KeyError::DerivationOverflow {
                path: path.to_string(),
                reason: format!(
                    "depth {} plus {steps} steps exceeds {MAX_DEPTH}",
                    key.depth()
                ),
            });
        }
        let xpriv = key
            .xpriv
            .derive_priv(&self.secp, &parsed)
            .map_err(|e| KeyError::Derivation(e.to_string()))?;
        Ok(ExtendedKey { xpriv })
    }

    /// Parse a serialised extended private key for this deriver's network.
    pub fn import_xprv(&self, serialized: &str) -> Result<ExtendedKey, KeyError> {
        let xpriv = Xpriv::from_str(serialized.trim())
            .map_err(|e| KeyError::InvalidKeySerialization(e.to_string()))?;
        if xpriv.network != self.network_kind() {
            return Err(KeyError::InvalidKeySerialization(format!(
                "key is not serialised for {}",
                self.network
            )));
        }
        Ok(ExtendedKey { xpriv })
    }
}

fn parse_path(path: &str) -> Result<DerivationPath, KeyError> {
    let trimmed = path.trim();
    for component in trimmed.split('/').skip_while(|c| *c == "m") {
        let digits = component.trim_end_matches(['\'', 'h', 'H']);
        if let Ok(index) = digits.parse::<u64>() {
            if index >= HARDENED_OFFSET {
                return Err(KeyError::DerivationOverflow {
                    path: path.to_string(),
                    reason: format!("child index {index} is outside the 31-bit index space"),
                });
            }
        }
    }
    DerivationPath::from_str(trimmed).map_err(|e| match e {
        bip32::Error::InvalidChildNumber(index) => KeyError::DerivationOverflow {
            path: path.to_string(),
            reason: format!("child index {index} is outside the 31-bit index space"),
        },
        other => KeyError::InvalidPath {
            path: path.to_string(),
            reason: other.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT_SEED: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4";
    const ABANDON_ABOUT_XPRV: &str = "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu";

    fn deriver() -> HdKeyDeriver {
        HdKeyDeriver::new(Network::Bitcoin)
    }

    #[test]
    fn master_matches_known_vector() {
        let master = deriver().master_from_seed_hex(ABANDON_ABOUT_SEED).unwrap();
        assert_eq!(master.serialize(), ABANDON_ABOUT_XPRV);
        assert!(master.is_master());
    }

    #[test]
    fn master_is_deterministic() {
        let d = deriver();
        let a = d.master_from_seed(&[7u8; 64]).unwrap();
        let b = d.master_from_seed(&[7u8; 64]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_network_serialises_as_tprv() {
        let master = HdKeyDeriver::new(Network::Signet)
            .master_from_seed_hex(ABANDON_ABOUT_SEED)
            .unwrap();
        assert!(master.serialize().starts_with("tprv"));
    }

    #[test]
    fn seed_hex_errors() {
        assert!(matches!(
            deriver().master_from_seed_hex("zz"),
            Err(KeyError::InvalidSeed(_))
        ));
        assert!(matches!(
            deriver().master_from_seed(&[1u8; 8]),
            Err(KeyError::InvalidSeed(_))
        ));
    }

    #[test]
    fn bip44_account_vector() {
        let d = deriver();
        let master = d.master_from_seed_hex(ABANDON_ABOUT_SEED).unwrap();
        let account = d.derive_path(&master, "m/44'/0'/0'").unwrap();
        assert_eq!(
            account.serialize(),
            "xprv9xpXFhFpqdQK3TmytPBqXtGSwS3DLjojFhTGht8gwAAii8py5X6pxeBnQ6ehJiyJ6nDjWGJfZ95WxByFXVkDxHXrqu53WCRGypk2ttuqncb"
        );
        assert_eq!(account.depth(), 3);
    }

    #[test]
    fn hardened_markers_are_equivalent() {
        let d = deriver();
        let master = d.master_from_seed_hex(ABANDON_ABOUT_SEED).unwrap();
        let apostrophe = d.derive_path(&master, "m/44'/0'/2'").unwrap();
        let h = d.derive_path(&master, "m/44h/0h/2h").unwrap();
        assert_eq!(apostrophe, h);
    }

    #[test]
    fn malformed_path_rejected() {
        let d = deriver();
        let master = d.master_from_seed(&[3u8; 32]).unwrap();
        for bad in ["m/44'/x'/0'", "m//1", "m/44'/0'/-1"] {
            assert!(
                matches!(d.derive_path(&master, bad), Err(KeyError::InvalidPath { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn index_overflow_rejected() {
        let d = deriver();
        let master = d.master_from_seed(&[3u8; 32]).unwrap();
        assert!(matches!(
            d.derive_path(&master, "m/44'/0'/2147483648'"),
            Err(KeyError::DerivationOverflow { .. })
        ));
        assert!(matches!(
            d.derive_path(&master, "m/2147483648"),
            Err(KeyError::DerivationOverflow { .. })
        ));
    }

    #[test]
    fn import_round_trips_serialisation() {
        let d = deriver();
        let imported = d.import_xprv(ABANDON_ABOUT_XPRV).unwrap();
        assert_eq!(imported.serialize(), ABANDON_ABOUT_XPRV);
    }

    #[test]
    fn import_rejects_garbage_and_wrong_network() {
        let d = deriver();
        assert!(matches!(
            d.import_xprv("xprv-not-a-key"),
            Err(KeyError::InvalidKeySerialization(_))
        ));
        assert!(matches!(
            HdKeyDeriver::new(Network::Regtest).import_xprv(ABANDON_ABOUT_XPRV),
            Err(KeyError::InvalidKeySerialization(_))
        ));
    }

    #[test]
    fn debug_hides_key() {
        let master = deriver().master_from_seed_hex(ABANDON_ABOUT_SEED).unwrap();
        assert!(!format!("{master:?}").contains("xprv"));
    }
}
