use nestrec_transcode::Transcode;
use nestrec_types::{Record, RecordId, Reference};

use super::{Scope, SingleValueDecoder, UnkeyedDecoder};
use crate::error::{DecodeError, DecodeResult};
use crate::path::{CodingPath, PathSegment};
use crate::traits::{RecordDecodable, ValueDecodable};

/// Named-field view over one record of a closed record set.
///
/// Mirrors [`KeyedEncoder`](crate::encode::KeyedEncoder): every read says
/// which kind of value it expects, and a stored value of another kind is a
/// [`DecodeError::TypeMismatch`].
pub struct KeyedDecoder<'r> {
    scope: Scope<'r>,
    record: &'r Record,
    prefix: Option<String>,
}

impl<'r> KeyedDecoder<'r> {
    pub(crate) fn new(scope: Scope<'r>, record: &'r Record) -> Self {
        Self {
            scope,
            record,
            prefix: None,
        }
    }

    /// The record being read.
    pub fn record(&self) -> &'r Record {
        self.record
    }

    pub fn record_id(&self) -> &'r RecordId {
        &self.record.id
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.scope.path()
    }

    fn key(&self, field: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        }
    }

    /// Whether `field` is stored on the record.
    pub fn contains(&self, field: &str) -> bool {
        self.record.contains(&self.key(field))
    }

    /// Absence check for optional fields: `true` when the field is not
    /// stored. Never fails; the caller decides what absence means.
    pub fn decode_nil(&self, field: &str) -> bool {
        !self.contains(field)
    }

    /// Field names visible through this container, relative to its prefix.
    pub fn all_fields(&self) -> Vec<&'r str> {
        let names = self.record.field_names();
        match &self.prefix {
            None => names.collect(),
            Some(prefix) => names
                .filter_map(|name| name.strip_prefix(prefix.as_str())?.strip_prefix('.'))
                .collect(),
        }
    }

    /// The single-value slot stored under `field`.
    pub fn single_value(&self, field: &str) -> DecodeResult<SingleValueDecoder<'r>> {
        let key = self.key(field);
        let value = self
            .record
            .get(&key)
            .ok_or_else(|| DecodeError::KeyNotFound {
                field: key.clone(),
                path: self.scope.path_string(),
            })?;
        Ok(SingleValueDecoder::new(
            self.scope.child(PathSegment::Field(key)),
            value,
        ))
    }

    pub fn decode<V: Transcode>(&self, field: &str) -> DecodeResult<V> {
        self.single_value(field)?.decode()
    }

    /// Like [`decode`](Self::decode), with `None` for an absent field.
    pub fn decode_if_present<V: Transcode>(&self, field: &str) -> DecodeResult<Option<V>> {
        if self.decode_nil(field) {
            return Ok(None);
        }
        self.decode(field).map(Some)
    }

    pub fn decode_list<V: Transcode>(&self, field: &str) -> DecodeResult<Vec<V>> {
        self.single_value(field)?.decode_list()
    }

    /// Follow the reference under `field` and decode its record.
    pub fn decode_object<T: RecordDecodable>(&self, field: &str) -> DecodeResult<T> {
        self.single_value(field)?.decode_object()
    }

    pub fn decode_object_if_present<T: RecordDecodable>(&self, field: &str) -> DecodeResult<Option<T>> {
        if self.decode_nil(field) {
            return Ok(None);
        }
        self.decode_object(field).map(Some)
    }

    /// Follow every reference under `field`, preserving stored order.
    pub fn decode_objects<T: RecordDecodable>(&self, field: &str) -> DecodeResult<Vec<T>> {
        self.single_value(field)?.decode_objects()
    }

    /// The raw reference under `field`, without following it.
    pub fn reference(&self, field: &str) -> DecodeResult<&'r Reference> {
        self.single_value(field)?.reference()
    }

    /// The raw references under `field`, without following them.
    pub fn references(&self, field: &str) -> DecodeResult<&'r [Reference]> {
        self.single_value(field)?.references()
    }

    /// Delegate to a value type's own single-value decoding.
    pub fn decode_value<V: ValueDecodable>(&self, field: &str) -> DecodeResult<V> {
        V::decode_value(self.single_value(field)?)
    }

    /// Ordered, position-tracked view over the sequence under `field`.
    pub fn unkeyed(&self, field: &str) -> DecodeResult<UnkeyedDecoder<'r>> {
        self.single_value(field)?.unkeyed()
    }

    /// Keyed view over the `field.<name>` fields of the same record.
    pub fn nested_keyed(&self, field: &str) -> KeyedDecoder<'r> {
        KeyedDecoder {
            scope: self.scope.clone(),
            record: self.record,
            prefix: Some(self.key(field)),
        }
    }

    /// Keyed view over the same record without any prefix.
    pub fn super_decoder(&self) -> KeyedDecoder<'r> {
        KeyedDecoder {
            scope: self.scope.clone(),
            record: self.record,
            prefix: None,
        }
    }
}
