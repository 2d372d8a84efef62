//! Error types for encoding and decoding.

use nestrec_transcode::TranscodeError;
use nestrec_types::FetchError;

/// Errors that abort an encode call.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// An object reached the encoder without an identifier.
    #[error("{record_type} at {path} has an empty identifier")]
    MissingIdentifier {
        record_type: &'static str,
        path: String,
    },

    /// A single sequence received both nested objects and scalar values.
    #[error("sequence {path} mixes record references and scalar values")]
    MixedSequence { path: String },

    /// A field value could not be converted to its stored form.
    #[error("cannot encode {path}: {source}")]
    Transcode {
        path: String,
        #[source]
        source: TranscodeError,
    },
}

/// Errors that abort a decode call (including reference resolution).
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The requested field is absent from the record.
    #[error("key not found: {field} (at {path})")]
    KeyNotFound { field: String, path: String },

    /// The stored value does not have the shape the domain type expects.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A reference points at a record missing from the record set.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// The store's fetch operation failed.
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// Blob contents behind an asset handle could not be read.
    #[error("cannot read asset for {path}: {source}")]
    Asset {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An unkeyed container was read past its last element.
    #[error("sequence {path} has no more elements (count {count})")]
    EndOfSequence { path: String, count: usize },

    /// A record is nested inside itself through owning references.
    #[error("cycle detected: record {id} is already being decoded (at {path})")]
    CycleDetected { id: String, path: String },

    /// Reference resolution did not close within the configured round limit.
    #[error("reference resolution exceeded {0} rounds")]
    RoundLimit(usize),

    /// There is no record to decode.
    #[error("empty record set")]
    EmptyRecordSet,
}

impl DecodeError {
    /// Attach a coding path to a transcoding failure.
    pub(crate) fn transcode(path: String, err: TranscodeError) -> Self {
        match err {
            TranscodeError::TypeMismatch { expected, found } => Self::TypeMismatch {
                path,
                expected: expected.to_string(),
                found,
            },
            TranscodeError::Asset { source, .. } => Self::Asset { path, source },
        }
    }

    pub(crate) fn mismatch(path: String, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias for encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;
