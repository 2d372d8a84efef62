use std::sync::Arc;

use async_trait::async_trait;
use nestrec_types::{FetchError, Record, RecordId};

/// The store's batched fetch-by-identifier operation.
///
/// Implementations return the records they found; identifiers with no
/// record are simply left out of the result. The order of the result is
/// not significant.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch_records(&self, ids: &[RecordId]) -> Result<Vec<Record>, FetchError>;
}

#[async_trait]
impl<F: RecordFetcher + ?Sized> RecordFetcher for Arc<F> {
    async fn fetch_records(&self, ids: &[RecordId]) -> Result<Vec<Record>, FetchError> {
        (**self).fetch_records(ids).await
    }
}
