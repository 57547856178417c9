//! BIP39 mnemonic generation, parsing and checksum inspection.
//!
//! Every wallet this system creates uses 128 bits of entropy (12 words).
//! Parsing is strict: every word must be in the English wordlist and the
//! embedded checksum must match the entropy. A checksum mismatch is an error,
//! never a warning.

use bip39::Language;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::hash::sha256;

/// Entropy size for every starter mnemonic.
pub const DEFAULT_ENTROPY_BITS: usize = 128;

const VALID_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];
const BITS_PER_WORD: usize = 11;

/// Errors arising from mnemonic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("unrecognised mnemonic word(s): {}", .0.join(", "))]
    InvalidWord(Vec<String>),

    #[error("invalid word count: {0} (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount(usize),

    #[error("mnemonic checksum does not match its entropy")]
    InvalidChecksum,

    #[error("invalid entropy length: {0} bits")]
    InvalidEntropyLength(usize),

    #[error("malformed mnemonic: {0}")]
    Malformed(String),
}

/// A validated BIP39 mnemonic together with its entropy and seed.
///
/// The sentence, entropy and seed are wiped when the value is dropped.
pub struct Mnemonic {
    sentence: Zeroizing<String>,
    entropy: Zeroizing<Vec<u8>>,
    seed: Zeroizing<[u8; 64]>,
}

impl Mnemonic {
    /// Generate a fresh mnemonic from OS randomness.
    pub fn generate(entropy_bits: usize, passphrase: &str) -> Result<Self, MnemonicError> {
        Self::generate_with(&mut OsRng, entropy_bits, passphrase)
    }

    /// Generate a mnemonic drawing entropy from `rng`.
    pub fn generate_with<R: RngCore + CryptoRng>(
        rng: &mut R,
        entropy_bits: usize,
        passphrase: &str,
    ) -> Result<Self, MnemonicError> {
        if !VALID_ENTROPY_BITS.contains(&entropy_bits) {
            return Err(MnemonicError::InvalidEntropyLength(entropy_bits));
        }
        let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
        rng.fill_bytes(&mut entropy);
        Self::from_entropy(&entropy, passphrase)
    }

    /// Build the mnemonic that encodes `entropy`.
    pub fn from_entropy(entropy: &[u8], passphrase: &str) -> Result<Self, MnemonicError> {
        let bits = entropy.len() * 8;
        if !VALID_ENTROPY_BITS.contains(&bits) {
            return Err(MnemonicError::InvalidEntropyLength(bits));
        }
        let inner = bip39::Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(|_| MnemonicError::InvalidEntropyLength(bits))?;
        Ok(Self::assemble(&inner, passphrase))
    }

    /// Parse a user-supplied sentence.
    ///
    /// Whitespace is collapsed and words are lower-cased before checking.
    /// Unknown words are reported together, then the word count, then the
    /// checksum.
    pub fn from_sentence(sentence: &str, passphrase: &str) -> Result<Self, MnemonicError> {
        let normalized = Zeroizing::new(
            sentence
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
        );
        let words: Vec<&str> = normalized.split_whitespace().collect();

        let unknown: Vec<String> = words
            .iter()
            .filter(|word| Language::English.find_word(word).is_none())
            .map(|word| word.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(MnemonicError::InvalidWord(unknown));
        }

        if !VALID_ENTROPY_BITS
            .iter()
            .any(|bits| words.len() == (bits + bits / 32) / BITS_PER_WORD)
        {
            return Err(MnemonicError::InvalidWordCount(words.len()));
        }

        let inner = bip39::Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| match e {
                bip39::Error::InvalidChecksum => MnemonicError::InvalidChecksum,
                bip39::Error::BadWordCount(n) => MnemonicError::InvalidWordCount(n),
                bip39::Error::BadEntropyBitCount(n) => MnemonicError::InvalidEntropyLength(n),
                bip39::Error::UnknownWord(i) => MnemonicError::InvalidWord(vec![words
                    .get(i)
                    .map(|w| w.to_string())
                    .unwrap_or_default()]),
                other => MnemonicError::Malformed(other.to_string()),
            })?;
        Ok(Self::assemble(&inner, passphrase))
    }

    fn assemble(inner: &bip39::Mnemonic, passphrase: &str) -> Self {
        Self {
            sentence: Zeroizing::new(inner.to_string()),
            entropy: Zeroizing::new(inner.to_entropy()),
            seed: Zeroizing::new(inner.to_seed(passphrase)),
        }
    }

    /// The space-separated sentence.
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.sentence.split(' ')
    }

    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    pub fn entropy_bits(&self) -> usize {
        self.entropy.len() * 8
    }

    /// The checksum bits as embedded in the words (the tail of the 11-bit
    /// word indices after the entropy bits).
    pub fn checksum_bits(&self) -> String {
        let mut bits = String::with_capacity(self.word_count() * BITS_PER_WORD);
        for word in self.words() {
            // Every word was validated against the wordlist on construction.
            let index = Language::English.find_word(word).unwrap_or_default();
            bits.push_str(&format!("{index:011b}"));
        }
        bits.split_off(self.entropy_bits())
    }

    /// The 512-bit BIP39 seed.
    pub fn seed(&self) -> &[u8; 64] {
        &self.seed
    }

    pub fn seed_hex(&self) -> String {
        hex::encode(&self.seed[..])
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.word_count())
            .field("entropy_bits", &self.entropy_bits())
            .finish_non_exhaustive()
    }
}

/// Render bytes as a string of `'0'`/`'1'`, most significant bit first.
pub fn bytes_to_binary(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:08b}")).collect()
}

/// The BIP39 checksum for `entropy`: the first `len * 8 / 32` bits of its
/// SHA-256 digest.
pub fn checksum_bits(entropy: &[u8]) -> String {
    let length = entropy.len() * 8 / 32;
    let mut bits = bytes_to_binary(&sha256(entropy));
    bits.truncate(length);
    bits
}
