//! Starter service: creates the master and derives dependent starters.

use rand::{CryptoRng, RngCore};
use starter_crypto::{
    master_record, rederive_starter, ExtendedKey, HdKeyDeriver, Mnemonic, DEFAULT_ENTROPY_BITS,
};
use starter_store::StarterStore;
use starter_types::{Network, StarterKind, StarterRecord};
use std::path::Path;

use crate::error::WalletError;
use crate::keystore;

/// Display name given to the master starter.
pub const MASTER_STARTER_NAME: &str = "Master";

/// Composes an HD deriver with an injected starter store.
pub struct StarterService<S> {
    store: S,
    deriver: HdKeyDeriver,
}

impl<S: StarterStore> StarterService<S> {
    pub fn new(store: S, network: Network) -> Self {
        Self {
            store,
            deriver: HdKeyDeriver::new(network),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deriver(&self) -> &HdKeyDeriver {
        &self.deriver
    }

    // ── Master ──────────────────────────────────────────────────────────

    /// Generate a fresh 12-word master from OS randomness and persist it.
    pub fn create_master(&self, passphrase: &str, force: bool) -> Result<StarterRecord, WalletError> {
        self.ensure_master_slot_free(force)?;
        let mnemonic = Mnemonic::generate(DEFAULT_ENTROPY_BITS, passphrase)?;
        self.persist_master(&mnemonic)
    }

    /// As [`create_master`](Self::create_master), drawing entropy from `rng`.
    pub fn create_master_with<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        passphrase: &str,
        force: bool,
    ) -> Result<StarterRecord, WalletError> {
        self.ensure_master_slot_free(force)?;
        let mnemonic = Mnemonic::generate_with(rng, DEFAULT_ENTROPY_BITS, passphrase)?;
        self.persist_master(&mnemonic)
    }

    /// Import a user-supplied sentence as the master.
    pub fn import_master(
        &self,
        sentence: &str,
        passphrase: &str,
        force: bool,
    ) -> Result<StarterRecord, WalletError> {
        let mnemonic = Mnemonic::from_sentence(sentence, passphrase)?;
        self.ensure_master_slot_free(force)?;
        self.persist_master(&mnemonic)
    }

    fn ensure_master_slot_free(&self, force: bool) -> Result<(), WalletError> {
        if self.store.has_master()? {
            if !force {
                return Err(WalletError::MasterAlreadyExists);
            }
            tracing::warn!("replacing existing master starter");
        }
        Ok(())
    }

    fn persist_master(&self, mnemonic: &Mnemonic) -> Result<StarterRecord, WalletError> {
        let record = master_record(&self.deriver, mnemonic, MASTER_STARTER_NAME)?;
        self.store.save_master(&record)?;
        tracing::info!(
            words = mnemonic.word_count(),
            network = %self.deriver.network(),
            "master starter created"
        );
        Ok(record)
    }

    /// Load the master and check its `xprv` against its own seed.
    pub fn load_master_verified(&self) -> Result<StarterRecord, WalletError> {
        let record = self
            .store
            .load_master()?
            .ok_or(WalletError::MissingMasterStarter)?;
        self.master_key(&record)?;
        Ok(record)
    }

    fn master_key(&self, record: &StarterRecord) -> Result<ExtendedKey, WalletError> {
        let stored = self.deriver.import_xprv(&record.xprv)?;
        let recomputed = self.deriver.master_from_seed_hex(&record.seed_hex)?;
        if stored != recomputed {
            tracing::error!(kind = %StarterKind::Master, "stored xprv does not match seed");
            return Err(WalletError::InconsistentStarter {
                kind: StarterKind::Master,
                reason: "xprv does not match seed_hex".to_string(),
            });
        }
        Ok(stored)
    }

    // ── Dependent starters ──────────────────────────────────────────────

    /// Rederive the layer-1 starter from the master and persist it.
    pub fn derive_l1_starter(&self, name: &str) -> Result<StarterRecord, WalletError> {
        self.derive_dependent(StarterKind::L1, name)
    }

    /// Rederive the starter for sidechain `slot` from the master and persist it.
    ///
    /// Re-running for the same master and slot rewrites identical bytes.
    pub fn derive_sidechain_starter(&self, slot: u8, name: &str) -> Result<StarterRecord, WalletError> {
        self.derive_dependent(StarterKind::Sidechain(slot), name)
    }

    fn derive_dependent(&self, kind: StarterKind, name: &str) -> Result<StarterRecord, WalletError> {
        let master = self
            .store
            .load_master()?
            .ok_or(WalletError::MissingMasterStarter)?;
        let master_key = self.master_key(&master)?;
        let record = rederive_starter(&self.deriver, &master_key, kind, name)?;
        self.store.save_checked(kind, &record)?;
        tracing::info!(%kind, chain = name, "derived wallet starter");
        Ok(record)
    }

    // ── Deletion ────────────────────────────────────────────────────────

    /// Remove the master. Dependent starters are left in place.
    pub fn delete_master(&self) -> Result<bool, WalletError> {
        let dependents = self.store.kinds()?.len().saturating_sub(1);
        let removed = self.store.delete_master()?;
        if removed && dependents > 0 {
            tracing::warn!(dependents, "master deleted while dependent starters remain");
        }
        Ok(removed)
    }

    pub fn delete_l1(&self) -> Result<bool, WalletError> {
        Ok(self.store.delete_l1()?)
    }

    pub fn delete_sidechain(&self, slot: u8) -> Result<bool, WalletError> {
        Ok(self.store.delete_sidechain(slot)?)
    }

    // ── Encrypted backup ────────────────────────────────────────────────

    /// Write the master mnemonic to a password-encrypted keystore at `path`.
    pub fn export_master(&self, path: &Path, password: &str) -> Result<(), WalletError> {
        let master = self.load_master_verified()?;
        let backup = keystore::encrypt_mnemonic(&master.mnemonic, password)?;
        keystore::save_keystore(&backup, path)?;
        tracing::info!(path = %path.display(), "exported master backup");
        Ok(())
    }

    /// Import the master from a keystore written by [`export_master`](Self::export_master).
    pub fn restore_master(
        &self,
        path: &Path,
        password: &str,
        passphrase: &str,
        force: bool,
    ) -> Result<StarterRecord, WalletError> {
        let backup = keystore::load_keystore(path)?;
        let sentence = keystore::decrypt_mnemonic(&backup, password)?;
        let record = self.import_master(&sentence, passphrase, force)?;
        tracing::info!(path = %path.display(), "restored master from backup");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starter_nullables::{NullEntropy, NullStarterStore};
    use starter_store::StoreError;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const ABANDON_ABOUT_XPRV: &str = "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu";

    fn service() -> StarterService<NullStarterStore> {
        StarterService::new(NullStarterStore::new(), Network::Bitcoin)
    }

    #[test]
    fn import_persists_known_master() {
        let service = service();
        let record = service.import_master(ABANDON_ABOUT, "", false).unwrap();
        assert_eq!(record.xprv, ABANDON_ABOUT_XPRV);
        assert_eq!(record.name, MASTER_STARTER_NAME);
        assert_eq!(service.store().load_master().unwrap(), Some(record));
    }

    #[test]
    fn fixed_entropy_master_is_abandon_about() {
        let service = service();
        let record = service
            .create_master_with(&mut NullEntropy::constant(0), "", false)
            .unwrap();
        assert_eq!(record.mnemonic, ABANDON_ABOUT);
        assert_eq!(record.xprv, ABANDON_ABOUT_XPRV);
    }

    #[test]
    fn generated_master_has_12_words() {
        let record = service().create_master("", false).unwrap();
        assert_eq!(record.word_count(), 12);
    }

    #[test]
    fn existing_master_is_not_overwritten() {
        let service = service();
        service.import_master(ABANDON_ABOUT, "", false).unwrap();
        assert!(matches!(
            service.create_master("", false),
            Err(WalletError::MasterAlreadyExists)
        ));
        assert_eq!(service.store().writes().len(), 1);

        let replaced = service
            .create_master_with(&mut NullEntropy::constant(0xff), "", true)
            .unwrap();
        assert_ne!(replaced.xprv, ABANDON_ABOUT_XPRV);
    }

    #[test]
    fn invalid_sentence_writes_nothing() {
        let service = service();
        let err = service
            .import_master("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon", "", false)
            .unwrap_err();
        assert!(matches!(err, WalletError::Mnemonic(_)));
        assert!(service.store().writes().is_empty());
    }

    #[test]
    fn sidechain_without_master_writes_nothing() {
        let service = service();
        assert!(matches!(
            service.derive_sidechain_starter(3, "zSide"),
            Err(WalletError::MissingMasterStarter)
        ));
        assert!(service.store().writes().is_empty());
        assert!(service.store().snapshot().is_empty());
    }

    #[test]
    fn sidechain_starter_is_persisted_under_its_slot() {
        let service = service();
        service.import_master(ABANDON_ABOUT, "", false).unwrap();
        let record = service.derive_sidechain_starter(2, "BitNames").unwrap();

        assert_eq!(record.parent_xprv.as_deref(), Some(ABANDON_ABOUT_XPRV));
        assert_eq!(record.derivation_path.as_deref(), Some("m/44'/0'/2'"));
        let entropy = Mnemonic::from_sentence(&record.mnemonic, "").unwrap();
        assert_eq!(hex::encode(entropy.entropy()), "81a3ead8fbf9992e4e68e03ba4876361");
        assert_eq!(service.store().load_sidechain(2).unwrap(), Some(record));
    }

    #[test]
    fn l1_starter_uses_reserved_index() {
        let service = service();
        service.import_master(ABANDON_ABOUT, "", false).unwrap();
        let record = service.derive_l1_starter("Bitcoin Core (Patched)").unwrap();
        assert_eq!(record.derivation_path.as_deref(), Some("m/44'/0'/256'"));
        let entropy = Mnemonic::from_sentence(&record.mnemonic, "").unwrap();
        assert_eq!(hex::encode(entropy.entropy()), "c5ea8578c96e62d0bc06bf717bd64f35");
    }

    #[test]
    fn tampered_master_is_inconsistent() {
        let deriver = HdKeyDeriver::new(Network::Bitcoin);
        let mnemonic = Mnemonic::from_sentence(ABANDON_ABOUT, "").unwrap();
        let mut record = master_record(&deriver, &mnemonic, MASTER_STARTER_NAME).unwrap();
        record.xprv = deriver
            .master_from_seed(&[9u8; 64])
            .unwrap()
            .serialize();

        let service = StarterService::new(
            NullStarterStore::new().with_record(StarterKind::Master, &record),
            Network::Bitcoin,
        );
        assert!(matches!(
            service.load_master_verified(),
            Err(WalletError::InconsistentStarter { kind: StarterKind::Master, .. })
        ));
        assert!(service.derive_sidechain_starter(2, "BitNames").is_err());
        assert!(service.store().writes().is_empty());
    }

    #[test]
    fn store_failure_propagates() {
        let service = service();
        service.import_master(ABANDON_ABOUT, "", false).unwrap();
        service.store().fail_writes_for(StarterKind::Sidechain(9));
        assert!(matches!(
            service.derive_sidechain_starter(9, "Thunder"),
            Err(WalletError::Store(StoreError::PersistenceVerificationFailed(_)))
        ));
        assert_eq!(service.store().load_sidechain(9).unwrap(), None);
    }

    #[test]
    fn deletes_pass_through() {
        let service = service();
        service.import_master(ABANDON_ABOUT, "", false).unwrap();
        service.derive_sidechain_starter(2, "BitNames").unwrap();

        assert!(service.delete_sidechain(2).unwrap());
        assert!(!service.delete_sidechain(2).unwrap());
        assert!(!service.delete_l1().unwrap());
        assert!(service.delete_master().unwrap());
        assert!(service.store().snapshot().is_empty());
    }

    #[test]
    fn backup_restores_the_same_master() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let original = service();
        original.import_master(ABANDON_ABOUT, "", false).unwrap();
        original.export_master(&path, "hunter2").unwrap();

        let restored = service();
        assert!(matches!(
            restored.restore_master(&path, "wrong", "", false),
            Err(WalletError::Keystore(_))
        ));
        let record = restored.restore_master(&path, "hunter2", "", false).unwrap();
        assert_eq!(record.xprv, ABANDON_ABOUT_XPRV);
    }
}
