use nestrec_types::{RecordId, TypeError};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record in a batch failed validation; nothing was saved.
    #[error("invalid record {id}: {source}")]
    InvalidRecord {
        id: RecordId,
        #[source]
        source: TypeError,
    },

    /// The store is not accepting requests.
    #[error("store unavailable")]
    Unavailable,

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
