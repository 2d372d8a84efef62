use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use nestrec_resolve::RecordFetcher;
use nestrec_types::{CascadeAction, FetchError, Record, RecordId, TypeError};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory, HashMap-based record store.
///
/// Intended for tests and embedding. All records are held in memory behind a
/// `RwLock` for safe concurrent access. Records are cloned on read/write.
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordId, Record>>,
    fetch_calls: AtomicUsize,
    available: AtomicBool,
}

impl InMemoryRecordStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            fetch_calls: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<RecordId, Record>>> {
        self.records.read().map_err(|_| StoreError::Poisoned)
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<RecordId, Record>>> {
        self.records.write().map_err(|_| StoreError::Poisoned)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove all records from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_map()?.clear();
        Ok(())
    }

    /// Return a sorted list of all record IDs in the store.
    pub fn all_ids(&self) -> StoreResult<Vec<RecordId>> {
        let map = self.read_map()?;
        let mut ids: Vec<RecordId> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Number of batched fetches served through [`RecordFetcher`].
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Simulate an outage: while unavailable, every operation fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(record: &Record) -> StoreResult<()> {
    let invalid = |source| StoreError::InvalidRecord {
        id: record.id.clone(),
        source,
    };
    if record.name().trim().is_empty() {
        return Err(invalid(TypeError::InvalidIdentifier(record.name().to_string())));
    }
    record.id.zone.validate().map_err(invalid)
}

fn is_referenced(map: &HashMap<RecordId, Record>, target: &RecordId) -> bool {
    map.values()
        .any(|record| record.references().iter().any(|r| &r.target == target))
}

impl RecordStore for InMemoryRecordStore {
    fn save_batch(&self, records: &[Record]) -> StoreResult<()> {
        self.check_available()?;
        for record in records {
            validate(record)?;
        }
        let mut map = self.write_map()?;
        for record in records {
            map.insert(record.id.clone(), record.clone());
        }
        debug!(count = records.len(), "saved record batch");
        Ok(())
    }

    fn fetch(&self, id: &RecordId) -> StoreResult<Option<Record>> {
        self.check_available()?;
        Ok(self.read_map()?.get(id).cloned())
    }

    fn delete(&self, id: &RecordId) -> StoreResult<Vec<RecordId>> {
        self.check_available()?;
        let mut map = self.write_map()?;
        if !map.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::from([id.clone()]);
        while let Some(next) = queue.pop_front() {
            let Some(record) = map.remove(&next) else {
                continue;
            };
            for reference in record.references() {
                if reference.action == CascadeAction::DeleteWithParent
                    && !is_referenced(&map, &reference.target)
                {
                    queue.push_back(reference.target.clone());
                }
            }
            removed.push(record.id);
        }
        debug!(id = %id, removed = removed.len(), "deleted record");
        Ok(removed)
    }
}

#[async_trait]
impl RecordFetcher for InMemoryRecordStore {
    async fn fetch_records(&self, ids: &[RecordId]) -> Result<Vec<Record>, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_batch(ids).map_err(|e| match e {
            StoreError::Unavailable => FetchError::Unavailable(e.to_string()),
            other => FetchError::Rejected(other.to_string()),
        })
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestrec_types::{FieldValue, Reference, Scalar, ZoneId};

    fn record(name: &str) -> Record {
        let mut record = Record::new("Item", RecordId::new(name));
        record.set("label", FieldValue::Scalar(Scalar::Text(name.into())));
        record
    }

    fn owning(name: &str, children: &[&str]) -> Record {
        let mut record = record(name);
        let refs = children
            .iter()
            .map(|c| Reference::new(RecordId::new(*c)))
            .collect();
        record.set("children", FieldValue::References(refs));
        record
    }

    fn id(name: &str) -> RecordId {
        RecordId::new(name)
    }

    // ----------------------------------------------------------------
    // Save / fetch
    // ----------------------------------------------------------------

    #[test]
    fn save_then_fetch() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("a"), record("b")]).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.fetch(&id("a")).unwrap(), Some(record("a")));
        assert!(store.fetch(&id("zzz")).unwrap().is_none());
    }

    #[test]
    fn save_replaces_existing() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("a")]).unwrap();
        let mut updated = record("a");
        updated.set("label", FieldValue::Scalar(Scalar::Text("updated".into())));
        store.save_batch(&[updated.clone()]).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.fetch(&id("a")).unwrap(), Some(updated));
    }

    #[test]
    fn invalid_batch_saves_nothing() {
        let store = InMemoryRecordStore::new();
        let err = store.save_batch(&[record("a"), record("")]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn zones_partition_records() {
        let store = InMemoryRecordStore::new();
        let zoned = Record::new("Item", RecordId::in_zone("a", ZoneId::new("archive")));
        store.save_batch(&[record("a"), zoned.clone()]).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.fetch(&zoned.id).unwrap(), Some(zoned));
    }

    #[test]
    fn fetch_batch_skips_unknown() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("a"), record("b")]).unwrap();
        let found = store.fetch_batch(&[id("a"), id("nope"), id("b")]).unwrap();
        let names: Vec<_> = found.iter().map(Record::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn all_ids_sorted() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("c"), record("a"), record("b")]).unwrap();
        let names: Vec<_> = store.all_ids().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn poisoned_store_reports_error() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("a")]).unwrap();
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.records.write().unwrap();
                panic!("writer died holding the lock");
            })
            .join()
        });
        assert!(matches!(store.len(), Err(StoreError::Poisoned)));
        assert!(matches!(store.is_empty(), Err(StoreError::Poisoned)));
        assert!(matches!(store.fetch(&id("a")), Err(StoreError::Poisoned)));
    }

    // ----------------------------------------------------------------
    // Cascade delete
    // ----------------------------------------------------------------

    #[test]
    fn delete_cascades_to_owned_records() {
        let store = InMemoryRecordStore::new();
        store
            .save_batch(&[owning("root", &["x", "y"]), owning("x", &["z"]), record("y"), record("z")])
            .unwrap();
        let removed = store.delete(&id("root")).unwrap();
        assert_eq!(removed[0], id("root"));
        assert_eq!(removed.len(), 4);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn delete_keeps_independent_targets() {
        let store = InMemoryRecordStore::new();
        let mut root = record("root");
        root.set(
            "link",
            FieldValue::Reference(Reference::with_action(id("x"), CascadeAction::Independent)),
        );
        store.save_batch(&[root, record("x")]).unwrap();
        assert_eq!(store.delete(&id("root")).unwrap(), vec![id("root")]);
        assert!(store.exists(&id("x")).unwrap());
    }

    #[test]
    fn delete_keeps_records_still_referenced() {
        let store = InMemoryRecordStore::new();
        store
            .save_batch(&[owning("a", &["shared"]), owning("b", &["shared"]), record("shared")])
            .unwrap();
        store.delete(&id("a")).unwrap();
        assert!(store.exists(&id("shared")).unwrap());
        let removed = store.delete(&id("b")).unwrap();
        assert_eq!(removed, vec![id("b"), id("shared")]);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let store = InMemoryRecordStore::new();
        assert!(matches!(store.delete(&id("nope")), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_survives_reference_cycles() {
        let store = InMemoryRecordStore::new();
        store
            .save_batch(&[owning("a", &["b"]), owning("b", &["a"])])
            .unwrap();
        let removed = store.delete(&id("a")).unwrap();
        assert_eq!(removed, vec![id("a"), id("b")]);
        assert!(store.is_empty().unwrap());
    }

    // ----------------------------------------------------------------
    // Fetcher
    // ----------------------------------------------------------------

    #[tokio::test]
    async fn fetcher_counts_batches() {
        let store = InMemoryRecordStore::new();
        store.save_batch(&[record("a"), record("b")]).unwrap();
        let found = store.fetch_records(&[id("a"), id("b")]).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(store.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_fetch() {
        let store = InMemoryRecordStore::new();
        store.set_available(false);
        let err = store.fetch_records(&[id("a")]).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
        assert!(matches!(store.save_batch(&[record("a")]), Err(StoreError::Unavailable)));
    }
}
