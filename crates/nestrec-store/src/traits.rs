use nestrec_types::{Record, RecordId};

use crate::error::StoreResult;

/// A flat record store.
///
/// Implementations must satisfy these invariants:
/// - `save_batch` is all-or-nothing: either every record is stored or none.
/// - Saving a record whose identifier already exists replaces it.
/// - Fetching never fails for an unknown identifier; it is just absent
///   from the result.
pub trait RecordStore: Send + Sync {
    /// Store every record in one batch.
    fn save_batch(&self, records: &[Record]) -> StoreResult<()>;

    /// Read one record by identifier.
    fn fetch(&self, id: &RecordId) -> StoreResult<Option<Record>>;

    /// Delete a record, cascading along `DeleteWithParent` references.
    ///
    /// A cascaded record is only removed once no remaining record refers
    /// to it. Returns every removed identifier, the requested one first.
    fn delete(&self, id: &RecordId) -> StoreResult<Vec<RecordId>>;

    /// Read multiple records in a batch, skipping unknown identifiers.
    ///
    /// Default implementation calls `fetch()` for each ID.
    fn fetch_batch(&self, ids: &[RecordId]) -> StoreResult<Vec<Record>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.fetch(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Check whether a record exists.
    fn exists(&self, id: &RecordId) -> StoreResult<bool> {
        Ok(self.fetch(id)?.is_some())
    }
}
