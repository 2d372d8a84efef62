use std::path::PathBuf;

use thiserror::Error;

/// Errors from converting between domain values and store-native scalars.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The stored value does not have the shape the domain type expects.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    /// Writing or reading blob contents failed.
    #[error("asset I/O error at {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscodeError {
    pub(crate) fn mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }
}

/// Result alias for transcoding.
pub type TranscodeResult<T> = Result<T, TranscodeError>;
