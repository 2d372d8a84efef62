//! Record set to object graph.
//!
//! The decoder runs entirely in memory over a record set that is expected
//! to be closed: every reference it follows must resolve inside the set.
//! Fetching the set is the resolver's job.

mod keyed;
mod single;
mod unkeyed;

pub use keyed::KeyedDecoder;
pub use single::SingleValueDecoder;
pub use unkeyed::UnkeyedDecoder;

use nestrec_types::{Record, RecordSet, Reference};
use tracing::debug;

use crate::error::{DecodeError, DecodeResult};
use crate::path::{CodingPath, PathSegment};
use crate::traits::RecordDecodable;

/// Decodes domain objects out of a closed record set.
#[derive(Clone, Copy, Debug)]
pub struct RecordDecoder<'r> {
    records: &'r RecordSet,
}

impl<'r> RecordDecoder<'r> {
    pub fn new(records: &'r RecordSet) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &'r RecordSet {
        self.records
    }

    /// Decode the first record in the set.
    ///
    /// This is the root for sets produced by the resolver. Encoder output
    /// puts the root last; use [`decode_root`](Self::decode_root) there.
    pub fn decode<T: RecordDecodable>(&self) -> DecodeResult<T> {
        let root = self.records.first().ok_or(DecodeError::EmptyRecordSet)?;
        self.decode_record(root)
    }

    /// Decode the record named `name`.
    pub fn decode_root<T: RecordDecodable>(&self, name: &str) -> DecodeResult<T> {
        let root = self
            .records
            .get(name)
            .ok_or_else(|| DecodeError::RecordNotFound(name.to_string()))?;
        self.decode_record(root)
    }

    /// Decode a specific record, resolving its references in the set.
    pub fn decode_record<T: RecordDecodable>(&self, record: &'r Record) -> DecodeResult<T> {
        let value = Scope::new(self.records).decode_record(record)?;
        debug!(
            id = %record.id,
            record_type = T::RECORD_TYPE,
            "decoded object graph"
        );
        Ok(value)
    }
}

/// Read-only state shared by the decode-side containers.
#[derive(Clone, Debug)]
pub(crate) struct Scope<'r> {
    records: &'r RecordSet,
    path: CodingPath,
    /// Records currently being decoded, outermost first.
    ancestors: Vec<&'r str>,
}

impl<'r> Scope<'r> {
    pub(crate) fn new(records: &'r RecordSet) -> Self {
        Self {
            records,
            path: CodingPath::new(),
            ancestors: Vec::new(),
        }
    }

    pub(crate) fn path(&self) -> &CodingPath {
        &self.path
    }

    pub(crate) fn path_string(&self) -> String {
        self.path.to_string()
    }

    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        Self {
            records: self.records,
            path: self.path.child(segment),
            ancestors: self.ancestors.clone(),
        }
    }

    pub(crate) fn resolve(&self, reference: &Reference) -> DecodeResult<&'r Record> {
        self.records.resolve(reference).ok_or_else(|| {
            debug!(target = %reference.target, path = %self.path, "dangling reference");
            DecodeError::RecordNotFound(reference.target_name().to_string())
        })
    }

    pub(crate) fn resolve_all(&self, references: &[Reference]) -> DecodeResult<Vec<&'r Record>> {
        references.iter().map(|r| self.resolve(r)).collect()
    }

    /// Decode `record` as a `T`, entering it as a new level.
    pub(crate) fn decode_record<T: RecordDecodable>(&self, record: &'r Record) -> DecodeResult<T> {
        if record.record_type != T::RECORD_TYPE {
            return Err(DecodeError::mismatch(
                self.path_string(),
                format!("record of type {}", T::RECORD_TYPE),
                format!("record of type {}", record.record_type),
            ));
        }
        if self.ancestors.contains(&record.name()) {
            return Err(DecodeError::CycleDetected {
                id: record.name().to_string(),
                path: self.path_string(),
            });
        }
        let mut scope = self.child(PathSegment::Record(record.name().to_string()));
        scope.ancestors.push(record.name());
        let container = KeyedDecoder::new(scope, record);
        T::decode_fields(&container)
    }
}
