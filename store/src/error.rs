use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("write to {} could not be verified", .0.display())]
    PersistenceVerificationFailed(PathBuf),

    #[error("starter file {} is corrupted: {reason}", .path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
