//! Object graph to record set.
//!
//! [`RecordEncoder::encode`] walks the graph depth-first. Every nested
//! object becomes its own [`Record`], appended to one shared accumulator as
//! soon as its own fields are done; the parent only keeps a [`Reference`]
//! to it. The root's record is therefore always the last one produced.
//!
//! [`Reference`]: nestrec_types::Reference

mod keyed;
mod single;
mod unkeyed;

pub use keyed::KeyedEncoder;
pub use single::SingleValueEncoder;
pub use unkeyed::UnkeyedEncoder;

use std::collections::HashSet;

use nestrec_transcode::{AssetStager, Transcode};
use nestrec_types::{Record, RecordId, RecordSet, Scalar, ZoneId};
use tracing::debug;

use crate::error::{EncodeError, EncodeResult};
use crate::path::{CodingPath, PathSegment};
use crate::traits::RecordEncodable;

/// Encodes domain objects into flat records.
///
/// The encoder never talks to a store: the returned records are meant to be
/// handed to the store's batch-save operation as they are.
#[derive(Clone, Debug, Default)]
pub struct RecordEncoder {
    zone: ZoneId,
    assets: AssetStager,
}

impl RecordEncoder {
    /// Encoder for the default zone, staging blobs in the OS temp dir.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every produced record and reference with `zone`.
    pub fn with_zone(mut self, zone: ZoneId) -> Self {
        self.zone = zone;
        self
    }

    /// Stage binary payloads through `assets`.
    pub fn with_assets(mut self, assets: AssetStager) -> Self {
        self.assets = assets;
        self
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn assets(&self) -> &AssetStager {
        &self.assets
    }

    /// Encode `root` and everything it owns into a record set.
    ///
    /// The set is unique by record name; the first record produced for a
    /// name wins. The root record is last. On error nothing is returned and
    /// any blob files staged along the way are removed.
    pub fn encode<T: RecordEncodable>(&self, root: &T) -> EncodeResult<Vec<Record>> {
        self.encode_set(root).map(RecordSet::into_vec)
    }

    /// Like [`encode`](Self::encode), but keeps the [`RecordSet`] index.
    pub fn encode_set<T: RecordEncodable>(&self, root: &T) -> EncodeResult<RecordSet> {
        let mut ctx = EncodeContext::new(self.zone.clone(), self.assets.tracked());
        let id = match ctx.encode_record(root) {
            Ok(id) => id,
            Err(e) => {
                let discarded = ctx.assets.discard();
                debug!(error = %e, discarded, "encode failed; staged assets removed");
                return Err(e);
            }
        };
        let assets = ctx.assets.staged().len();
        let records = ctx.into_records();
        debug!(
            root = %id,
            record_type = T::RECORD_TYPE,
            records = records.len(),
            assets,
            "encoded object graph"
        );
        Ok(records)
    }
}

/// State threaded through one encode call.
///
/// Owned by the top-level [`RecordEncoder::encode`] call and lent to every
/// container below it; nothing else writes to the accumulator.
#[derive(Debug)]
pub(crate) struct EncodeContext {
    zone: ZoneId,
    assets: AssetStager,
    records: RecordSet,
    /// Records whose fields are currently being written (the recursion stack).
    in_progress: HashSet<String>,
    path: CodingPath,
}

impl EncodeContext {
    pub(crate) fn new(zone: ZoneId, assets: AssetStager) -> Self {
        Self {
            zone,
            assets,
            records: RecordSet::new(),
            in_progress: HashSet::new(),
            path: CodingPath::new(),
        }
    }

    pub(crate) fn into_records(self) -> RecordSet {
        self.records
    }

    pub(crate) fn path(&self) -> &CodingPath {
        &self.path
    }

    pub(crate) fn record_id(&self, name: &str) -> RecordId {
        RecordId::in_zone(name, self.zone.clone())
    }

    /// Encode `value` into its own record and append it to the accumulator.
    ///
    /// Returns the identifier to reference. If a record with the same name
    /// has already been produced, or is being produced further up the
    /// stack, nothing is encoded again: the caller just links to it.
    pub(crate) fn encode_record<T: RecordEncodable>(&mut self, value: &T) -> EncodeResult<RecordId> {
        let name = value.record_name();
        if name.trim().is_empty() {
            return Err(EncodeError::MissingIdentifier {
                record_type: T::RECORD_TYPE,
                path: self.path.to_string(),
            });
        }
        let id = self.record_id(name);
        if self.records.contains(name) || self.in_progress.contains(name) {
            debug!(id = id.short(), "record already encoded; linking only");
            return Ok(id);
        }

        self.in_progress.insert(name.to_string());
        self.path.push(PathSegment::Record(name.to_string()));
        let mut record = Record::new(T::RECORD_TYPE, id.clone());
        let result = {
            let mut container = KeyedEncoder::new(self, &mut record, value);
            value.encode_fields(&mut container)
        };
        self.path.pop();
        self.in_progress.remove(name);
        result?;

        debug!(
            id = %id,
            record_type = T::RECORD_TYPE,
            fields = record.len(),
            "produced record"
        );
        self.records.insert(record);
        Ok(id)
    }

    /// Convert a scalar for the field at `key`.
    pub(crate) fn transcode<V: Transcode>(&self, key: &str, value: &V) -> EncodeResult<Scalar> {
        value
            .to_scalar(&self.assets)
            .map_err(|source| EncodeError::Transcode {
                path: self.path.with_field(key),
                source,
            })
    }

    pub(crate) fn transcode_all<V: Transcode>(&self, key: &str, values: &[V]) -> EncodeResult<Vec<Scalar>> {
        values.iter().map(|v| self.transcode(key, v)).collect()
    }

    pub(crate) fn push_path(&mut self, segment: PathSegment) {
        self.path.push(segment);
    }

    pub(crate) fn pop_path(&mut self) {
        self.path.pop();
    }
}
