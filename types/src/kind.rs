//! Starter kinds and their on-disk file names.

use std::fmt;

use crate::TypeError;

/// Hardened BIP44 account index reserved for the layer-1 starter.
///
/// Sidechain slots are `u8`, so they can never reach this index.
pub const L1_DERIVATION_INDEX: u32 = 256;

/// Identifies one starter within the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StarterKind {
    /// The user's own master wallet; root of every other starter.
    Master,
    /// The starter for the single layer-1 node.
    L1,
    /// The starter for the sidechain registered at this slot.
    Sidechain(u8),
}

impl StarterKind {
    /// File name under the `wallet_starters` directory.
    pub fn file_name(&self) -> String {
        match self {
            Self::Master => "master_starter.json".to_string(),
            Self::L1 => "l1_starter.json".to_string(),
            Self::Sidechain(slot) => format!("sidechain_{slot}_starter.json"),
        }
    }

    /// Inverse of [`file_name`](Self::file_name).
    pub fn from_file_name(name: &str) -> Result<Self, TypeError> {
        match name {
            "master_starter.json" => return Ok(Self::Master),
            "l1_starter.json" => return Ok(Self::L1),
            _ => {}
        }
        name.strip_prefix("sidechain_")
            .and_then(|rest| rest.strip_suffix("_starter.json"))
            .and_then(|digits| {
                digits
                    .parse::<u8>()
                    .ok()
                    .filter(|slot| slot.to_string() == digits)
            })
            .map(Self::Sidechain)
            .ok_or_else(|| TypeError::UnknownStarterFile(name.to_string()))
    }

    /// Derivation path taken from the master key, or `None` for the master itself.
    pub fn derivation_path(&self) -> Option<String> {
        match self {
            Self::Master => None,
            Self::L1 => Some(format!("m/44'/0'/{L1_DERIVATION_INDEX}'")),
            Self::Sidechain(slot) => Some(format!("m/44'/0'/{slot}'")),
        }
    }
}

impl fmt::Display for StarterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str("master"),
            Self::L1 => f.write_str("l1"),
            Self::Sidechain(slot) => write!(f, "sidechain {slot}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_match_layout() {
        assert_eq!(StarterKind::Master.file_name(), "master_starter.json");
        assert_eq!(StarterKind::L1.file_name(), "l1_starter.json");
        assert_eq!(
            StarterKind::Sidechain(9).file_name(),
            "sidechain_9_starter.json"
        );
    }

    #[test]
    fn file_name_parses_back() {
        for kind in [
            StarterKind::Master,
            StarterKind::L1,
            StarterKind::Sidechain(0),
            StarterKind::Sidechain(255),
        ] {
            assert_eq!(StarterKind::from_file_name(&kind.file_name()), Ok(kind));
        }
    }

    #[test]
    fn foreign_files_rejected() {
        assert!(StarterKind::from_file_name("notes.txt").is_err());
        assert!(StarterKind::from_file_name("sidechain_256_starter.json").is_err());
        assert!(StarterKind::from_file_name("sidechain_x_starter.json").is_err());
        assert!(StarterKind::from_file_name("sidechain_09_starter.json").is_err());
        assert!(StarterKind::from_file_name("sidechain_+9_starter.json").is_err());
    }

    #[test]
    fn derivation_paths() {
        assert_eq!(StarterKind::Master.derivation_path(), None);
        assert_eq!(
            StarterKind::L1.derivation_path().as_deref(),
            Some("m/44'/0'/256'")
        );
        assert_eq!(
            StarterKind::Sidechain(2).derivation_path().as_deref(),
            Some("m/44'/0'/2'")
        );
    }
}
