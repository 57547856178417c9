//! Argon2id encrypted keystore for the master mnemonic.
//!
//! Encrypts the master sentence with a user-chosen password:
//! 1. Argon2id derives a 32-byte encryption key from the password + random salt
//! 2. AES-256-GCM encrypts the sentence with a random nonce
//! 3. The result is stored as a JSON file with all parameters for future decryption
//!
//! The BIP39 passphrase, if any, is never stored.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zeroize::Zeroizing;

use crate::error::WalletError;

/// Argon2id parameters: 64 MB memory, 3 iterations, 1 lane of parallelism.
const ARGON2_MEMORY_KIB: u32 = 65536; // 64 MB
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;
const ARGON2_OUTPUT_LEN: usize = 32;

const KEYSTORE_VERSION: u32 = 1;
/// Salt length in bytes.
const SALT_LEN: usize = 32;
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;

/// The top-level keystore file structure, serializable to/from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub crypto: KeystoreCrypto,
}

/// The crypto section of the keystore, containing all encryption parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// KDF parameters for Argon2id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Encrypt a mnemonic sentence with a password using Argon2id + AES-256-GCM.
pub fn encrypt_mnemonic(sentence: &str, password: &str) -> Result<KeystoreFile, WalletError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let params = KdfParams {
        memory: ARGON2_MEMORY_KIB,
        iterations: ARGON2_ITERATIONS,
        parallelism: ARGON2_PARALLELISM,
    };
    let derived_key = derive_key(password, &salt, &params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Keystore(format!("AES key init failed: {e}")))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), sentence.as_bytes())
        .map_err(|e| WalletError::Keystore(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        crypto: KeystoreCrypto {
            cipher: "aes-256-gcm".to_string(),
            kdf: "argon2id".to_string(),
            kdf_params: params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore with the given password, returning the mnemonic sentence.
pub fn decrypt_mnemonic(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<Zeroizing<String>, WalletError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(WalletError::Keystore(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }
    if keystore.crypto.cipher != "aes-256-gcm" || keystore.crypto.kdf != "argon2id" {
        return Err(WalletError::Keystore(format!(
            "unsupported keystore scheme: {}/{}",
            keystore.crypto.kdf, keystore.crypto.cipher
        )));
    }

    let salt = decode_field("salt", &keystore.crypto.salt)?;
    let nonce_bytes = decode_field("nonce", &keystore.crypto.nonce)?;
    let ciphertext = decode_field("ciphertext", &keystore.crypto.ciphertext)?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Keystore(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    check_kdf_limits(&keystore.crypto.kdf_params)?;
    let derived_key = derive_key(password, &salt, &keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Keystore(format!("AES key init failed: {e}")))?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| {
                WalletError::Keystore("decryption failed: wrong password or corrupted data".to_string())
            })?,
    );

    let sentence = std::str::from_utf8(&plaintext)
        .map_err(|_| WalletError::Keystore("decrypted payload is not UTF-8".to_string()))?;
    Ok(Zeroizing::new(sentence.to_string()))
}

/// Save a keystore to a JSON file.
pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(keystore)
        .map_err(|e| WalletError::Keystore(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        WalletError::Keystore(format!("failed to write {}: {e}", path.display()))
    })
}

/// Load a keystore from a JSON file.
pub fn load_keystore(path: &Path) -> Result<KeystoreFile, WalletError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Keystore(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json)
        .map_err(|e| WalletError::Keystore(format!("invalid keystore JSON: {e}")))
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, WalletError> {
    hex::decode(value).map_err(|e| WalletError::Keystore(format!("invalid {name} hex: {e}")))
}

/// KDF costs read from a backup may not exceed the ones written by
/// [`encrypt_mnemonic`].
fn check_kdf_limits(kdf: &KdfParams) -> Result<(), WalletError> {
    if kdf.memory > ARGON2_MEMORY_KIB
        || kdf.iterations > ARGON2_ITERATIONS
        || kdf.parallelism > ARGON2_PARALLELISM
    {
        return Err(WalletError::Keystore(format!(
            "KDF parameters exceed limits: memory {} KiB, {} iterations, {} lanes",
            kdf.memory, kdf.iterations, kdf.parallelism
        )));
    }
    Ok(())
}

/// Derive a 32-byte key from a password and salt using Argon2id.
fn derive_key(
    password: &str,
    salt: &[u8],
    kdf: &KdfParams,
) -> Result<Zeroizing<[u8; ARGON2_OUTPUT_LEN]>, WalletError> {
    let params = Params::new(
        kdf.memory,
        kdf.iterations,
        kdf.parallelism,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| WalletError::Keystore(format!("Argon2 params error: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; ARGON2_OUTPUT_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut output[..])
        .map_err(|e| WalletError::Keystore(format!("Argon2 hashing failed: {e}")))?;
    Ok(output)
}
