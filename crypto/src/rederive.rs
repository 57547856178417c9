//! Opaque rederivation of dependent-chain wallets.
//!
//! A dependent starter is not the BIP32 child of the master. Instead:
//!
//! 1. derive the child at the chain's path (`m/44'/0'/<slot>'`, or
//!    `m/44'/0'/256'` for layer 1);
//! 2. SHA-256 the child's 32 private-key bytes;
//! 3. take the first 16 bytes of the digest as fresh entropy;
//! 4. build a 12-word mnemonic from it (empty passphrase);
//! 5. use that mnemonic's master key as the chain's root.
//!
//! Anyone holding the master can recompute the same wallet, but the chain's
//! own keys cannot be related to the master's tree by BIP32 algebra. This is
//! intentionally non-standard; downstream wallets depend on the exact bytes.

use starter_types::{ChainLayer, StarterKind, StarterRecord};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::hash::sha256;
use crate::hd::{ExtendedKey, HdKeyDeriver, KeyError};
use crate::mnemonic::{Mnemonic, MnemonicError};

/// Entropy taken from the child-key digest: always 128 bits.
pub const REDERIVED_ENTROPY_BYTES: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RederiveError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error("the master starter is not derived from another key")]
    NotDependent,
}

/// The fresh wallet produced for a dependent chain.
#[derive(Debug)]
pub struct RederivedWallet {
    pub mnemonic: Mnemonic,
    pub master: ExtendedKey,
    pub derivation_path: String,
}

impl RederivedWallet {
    /// Package as a persisted record. `parent_xprv` is the upstream master.
    pub fn into_record(
        self,
        name: impl Into<String>,
        chain_layer: ChainLayer,
        parent: &ExtendedKey,
    ) -> StarterRecord {
        StarterRecord {
            name: name.into(),
            mnemonic: self.mnemonic.sentence().to_string(),
            seed_hex: self.mnemonic.seed_hex(),
            xprv: self.master.serialize(),
            parent_xprv: Some(parent.serialize()),
            derivation_path: Some(self.derivation_path),
            chain_layer: Some(chain_layer),
        }
    }
}

/// First 16 bytes of SHA-256 over a child private key.
pub fn entropy_from_child_key(child_private_key: &[u8; 32]) -> Zeroizing<[u8; REDERIVED_ENTROPY_BYTES]> {
    let digest = Zeroizing::new(sha256(child_private_key));
    let mut entropy = Zeroizing::new([0u8; REDERIVED_ENTROPY_BYTES]);
    entropy.copy_from_slice(&digest[..REDERIVED_ENTROPY_BYTES]);
    entropy
}

/// Rederive the dependent wallet reached from `upstream` at `path`.
pub fn rederive(
    deriver: &HdKeyDeriver,
    upstream: &ExtendedKey,
    path: &str,
) -> Result<RederivedWallet, RederiveError> {
    let child = deriver.derive_path(upstream, path)?;
    let entropy = entropy_from_child_key(&child.private_key_bytes());
    let mnemonic = Mnemonic::from_entropy(&entropy[..], "")?;
    let master = deriver.master_from_seed(mnemonic.seed())?;
    Ok(RederivedWallet {
        mnemonic,
        master,
        derivation_path: path.to_string(),
    })
}

/// Rederive and package the starter for `kind` (layer 1 or a sidechain slot).
pub fn rederive_starter(
    deriver: &HdKeyDeriver,
    upstream: &ExtendedKey,
    kind: StarterKind,
    name: impl Into<String>,
) -> Result<StarterRecord, RederiveError> {
    let (path, layer) = match kind {
        StarterKind::Master => return Err(RederiveError::NotDependent),
        StarterKind::L1 => (kind.derivation_path(), ChainLayer::L1),
        StarterKind::Sidechain(_) => (kind.derivation_path(), ChainLayer::L2),
    };
    let path = path.ok_or(RederiveError::NotDependent)?;
    let wallet = rederive(deriver, upstream, &path)?;
    Ok(wallet.into_record(name, layer, upstream))
}

/// Package a user master mnemonic as the master starter record.
pub fn master_record(
    deriver: &HdKeyDeriver,
    mnemonic: &Mnemonic,
    name: impl Into<String>,
) -> Result<StarterRecord, KeyError> {
    let master = deriver.master_from_seed(mnemonic.seed())?;
    Ok(StarterRecord {
        name: name.into(),
        mnemonic: mnemonic.sentence().to_string(),
        seed_hex: mnemonic.seed_hex(),
        xprv: master.serialize(),
        parent_xprv: None,
        derivation_path: None,
        chain_layer: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use starter_types::Network;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn setup() -> (HdKeyDeriver, ExtendedKey) {
        let deriver = HdKeyDeriver::new(Network::Bitcoin);
        let mnemonic = Mnemonic::from_sentence(ABANDON_ABOUT, "").unwrap();
        let master = deriver.master_from_seed(mnemonic.seed()).unwrap();
        (deriver, master)
    }

    #[test]
    fn sidechain_slot_2_conformance() {
        let (deriver, master) = setup();
        let child = deriver.derive_path(&master, "m/44'/0'/2'").unwrap();
        assert_eq!(
            hex::encode(*child.private_key_bytes()),
            "4545fd1535f2dc9b0fa04e6685494a006e9dcc91a2bf2fae3934bc6a4930347b"
        );
        let wallet = rederive(&deriver, &master, "m/44'/0'/2'").unwrap();
        assert_eq!(
            hex::encode(wallet.mnemonic.entropy()),
            "81a3ead8fbf9992e4e68e03ba4876361"
        );
        assert_eq!(wallet.mnemonic.word_count(), 12);
    }

    #[test]
    fn l1_and_slot_3_conformance() {
        let (deriver, master) = setup();
        let l1 = rederive(&deriver, &master, "m/44'/0'/256'").unwrap();
        assert_eq!(
            hex::encode(l1.mnemonic.entropy()),
            "c5ea8578c96e62d0bc06bf717bd64f35"
        );
        let slot3 = rederive(&deriver, &master, "m/44'/0'/3'").unwrap();
        assert_eq!(
            hex::encode(slot3.mnemonic.entropy()),
            "2d4f6251c3a0db708de7d5775bdf740b"
        );
    }

    fn assert_record(kind: StarterKind, mnemonic: &str, seed_hex: &str, xprv: &str) {
        let (deriver, master) = setup();
        let record = rederive_starter(&deriver, &master, kind, "chain").unwrap();
        assert_eq!(record.mnemonic, mnemonic);
        assert_eq!(record.seed_hex, seed_hex);
        assert_eq!(record.xprv, xprv);
    }

    #[test]
    fn slot_2_record_vector() {
        assert_record(
            StarterKind::Sidechain(2),
            "like butter renew wave office now defy bright desert category sugar secret",
            "fdc07b44d3493c0e3e3574c93164235ea6dc5a82715ed3acf4d691d4df0f79cf55e7b5fd168145de86c8850866b66a9ad36ca521bfa8904acc276a634645cc7b",
            "xprv9s21ZrQH143K2a7Ceqmv544GsRp84pvUanWBeFuuiMReiVuqbhXXf5td8eLDnZtYwc4eyFrrTmRAXe9ukYJatuh6X1RkZBKxkutK21chhE2",
        );
    }

    #[test]
    fn slot_3_record_vector() {
        assert_record(
            StarterKind::Sidechain(3),
            "coil kitchen nerve mansion asset reunion daring wide jar ten tackle bike",
            "3aba425f26668ff9ca682f07e782bfec7661730e8479727cce1624b6b9d9ee0aa5f3d9b6a352c3337e403ee008e80dffea659a41f8a2e6a3cdd5cdd07769eef5",
            "xprv9s21ZrQH143K2zmsNyd3K2sgMjUUPfAv4fAEEjE7TFGsQDv465ghK6HtPwjyBeAHYte7aX44qiDc5ZNRgEYVkHFikZe446TGj6nMHB8fTtY",
        );
    }

    #[test]
    fn l1_record_vector() {
        assert_record(
            StarterKind::L1,
            "shine feature funny name tower hair useless subject imitate team need hill",
            "adc0a3af96e0279049df4f74d8aaffae7f6ac173d1da8d68d42729d6756d432606791a29ea40c79241240c0ab2350b56a83ab8069a2ecd66bf2e0f3d38a16935",
            "xprv9s21ZrQH143K2pygWTQtT22bVUPSs1i8YpAKNT3t4RNQ3NjcJFWhujCuwgx6xNd8KySP7ZJPiBDiYceDogE9fxv8RkUDhFusuu2LPYNUXit",
        );
    }

    #[test]
    fn rederivation_is_deterministic() {
        let (deriver, master) = setup();
        let a = rederive_starter(&deriver, &master, StarterKind::Sidechain(2), "Thunder").unwrap();
        let b = rederive_starter(&deriver, &master, StarterKind::Sidechain(2), "Thunder").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn record_is_not_the_bip32_child() {
        let (deriver, master) = setup();
        let record =
            rederive_starter(&deriver, &master, StarterKind::Sidechain(2), "Thunder").unwrap();
        let path = record.derivation_path.clone().unwrap();
        let bip32_child = deriver.derive_path(&master, &path).unwrap();
        assert_ne!(record.xprv, bip32_child.serialize());

        let own_root = deriver.import_xprv(&record.xprv).unwrap();
        assert_ne!(*own_root.private_key_bytes(), *bip32_child.private_key_bytes());
        assert!(own_root.is_master());
    }

    #[test]
    fn record_is_self_consistent() {
        let (deriver, master) = setup();
        let record = rederive_starter(&deriver, &master, StarterKind::L1, "Bitcoin Core (Patched)").unwrap();
        let from_seed = deriver.master_from_seed_hex(&record.seed_hex).unwrap();
        assert_eq!(from_seed.serialize(), record.xprv);
        let reparsed = Mnemonic::from_sentence(&record.mnemonic, "").unwrap();
        assert_eq!(reparsed.seed_hex(), record.seed_hex);
        assert_eq!(record.parent_xprv.as_deref(), Some(master.serialize().as_str()));
        assert_eq!(record.derivation_path.as_deref(), Some("m/44'/0'/256'"));
        assert_eq!(record.chain_layer, Some(ChainLayer::L1));
    }

    #[test]
    fn slots_give_distinct_wallets() {
        let (deriver, master) = setup();
        let a = rederive_starter(&deriver, &master, StarterKind::Sidechain(2), "a").unwrap();
        let b = rederive_starter(&deriver, &master, StarterKind::Sidechain(3), "b").unwrap();
        assert_ne!(a.mnemonic, b.mnemonic);
        assert_ne!(a.xprv, b.xprv);
    }

    #[test]
    fn master_kind_is_rejected() {
        let (deriver, master) = setup();
        assert_eq!(
            rederive_starter(&deriver, &master, StarterKind::Master, "x").unwrap_err(),
            RederiveError::NotDependent
        );
    }

    #[test]
    fn master_record_has_no_lineage() {
        let deriver = HdKeyDeriver::new(Network::Bitcoin);
        let mnemonic = Mnemonic::from_sentence(ABANDON_ABOUT, "").unwrap();
        let record = master_record(&deriver, &mnemonic, "Master").unwrap();
        assert_eq!(
            record.xprv,
            "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"
        );
        assert!(record.parent_xprv.is_none());
        assert!(record.derivation_path.is_none());
        assert!(record.chain_layer.is_none());
    }
}
