use thiserror::Error;

/// Errors produced by record model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid zone name: {0}")]
    InvalidZone(String),
}

/// Transport-level failure reported by a store's fetch-by-identifiers
/// operation. Passed through the decoder unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (permissions, quota, bad zone).
    #[error("fetch rejected: {0}")]
    Rejected(String),
}
