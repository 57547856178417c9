//! Key material for wallet starters.
//!
//! - **BIP39** mnemonics: generation, strict parsing, checksum bit strings
//! - **BIP32** extended private keys over secp256k1 (`bitcoin::bip32`)
//! - **Opaque rederivation**: a dependent chain's wallet is rebuilt from the
//!   SHA-256 of a derived child key, so its keys carry no BIP32 link back to
//!   the master

pub mod hash;
pub mod hd;
pub mod mnemonic;
pub mod rederive;

pub use hash::sha256;
pub use hd::{ExtendedKey, HdKeyDeriver, KeyError};
pub use mnemonic::{
    bytes_to_binary, checksum_bits, Mnemonic, MnemonicError, DEFAULT_ENTROPY_BITS,
};
pub use rederive::{
    entropy_from_child_key, master_record, rederive, rederive_starter, RederiveError,
    RederivedWallet, REDERIVED_ENTROPY_BYTES,
};
