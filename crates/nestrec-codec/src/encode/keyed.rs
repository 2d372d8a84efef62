use nestrec_transcode::Transcode;
use nestrec_types::{CascadeAction, Record, RecordId};

use super::{EncodeContext, SingleValueEncoder, UnkeyedEncoder};
use crate::error::EncodeResult;
use crate::path::CodingPath;
use crate::traits::{FieldPolicy, RecordEncodable, ValueEncodable};

/// Named-field view over the record currently being produced.
///
/// Each write states what kind of value it is -- scalar, scalar list,
/// nested object, or sequence of nested objects -- so no runtime type
/// inspection is needed. Writes to an ignored field are skipped, and so are
/// writes through a nested view of an ignored field.
pub struct KeyedEncoder<'a> {
    ctx: &'a mut EncodeContext,
    record: &'a mut Record,
    policy: &'a dyn FieldPolicy,
    prefix: Option<String>,
    suppressed: bool,
}

impl<'a> KeyedEncoder<'a> {
    pub(crate) fn new(
        ctx: &'a mut EncodeContext,
        record: &'a mut Record,
        policy: &'a dyn FieldPolicy,
    ) -> Self {
        Self {
            ctx,
            record,
            policy,
            prefix: None,
            suppressed: false,
        }
    }

    /// Identifier of the record being written.
    pub fn record_id(&self) -> &RecordId {
        &self.record.id
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.ctx.path()
    }

    fn full_key(&self, field: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        }
    }

    /// True if `key` or any of its dotted ancestors is ignored.
    fn is_ignored(&self, key: &str) -> bool {
        key.match_indices('.')
            .map(|(at, _)| &key[..at])
            .chain(std::iter::once(key))
            .any(|k| self.policy.is_ignored(k))
    }

    /// Store key for `field`, or `None` if the owner ignores it.
    fn key(&self, field: &str) -> Option<String> {
        if self.suppressed {
            return None;
        }
        let key = self.full_key(field);
        (!self.is_ignored(&key)).then_some(key)
    }

    /// A single-value slot for `field`.
    pub fn single_value(&mut self, field: &str) -> SingleValueEncoder<'_> {
        let key = self.key(field);
        let action = key
            .as_deref()
            .map(|k| self.policy.action_for(k))
            .unwrap_or_default();
        SingleValueEncoder::new(&mut *self.ctx, &mut *self.record, key, action)
    }

    /// Write a scalar.
    pub fn encode<V: Transcode>(&mut self, field: &str, value: &V) -> EncodeResult<()> {
        self.single_value(field).encode(value)
    }

    /// Write a scalar, or clear the field for `None`.
    pub fn encode_if_present<V: Transcode>(&mut self, field: &str, value: Option<&V>) -> EncodeResult<()> {
        match value {
            Some(value) => self.encode(field, value),
            None => self.encode_nil(field),
        }
    }

    /// Write an ordered sequence of scalars.
    pub fn encode_list<V: Transcode>(&mut self, field: &str, values: &[V]) -> EncodeResult<()> {
        self.single_value(field).encode_list(values)
    }

    /// Encode `value` as its own record and link to it.
    pub fn encode_object<T: RecordEncodable>(&mut self, field: &str, value: &T) -> EncodeResult<()> {
        self.single_value(field).encode_object(value)
    }

    /// Like [`encode_object`](Self::encode_object), clearing the field for `None`.
    pub fn encode_object_if_present<T: RecordEncodable>(
        &mut self,
        field: &str,
        value: Option<&T>,
    ) -> EncodeResult<()> {
        match value {
            Some(value) => self.encode_object(field, value),
            None => self.encode_nil(field),
        }
    }

    /// Encode every element as its own record and store the ordered links.
    pub fn encode_objects<T: RecordEncodable>(&mut self, field: &str, values: &[T]) -> EncodeResult<()> {
        self.single_value(field).encode_objects(values)
    }

    /// Link to a record by name without encoding it.
    ///
    /// Used for back-references (child to parent) so that cyclic graphs
    /// can be stored without ownership cycles.
    pub fn encode_reference(&mut self, field: &str, name: &str, action: CascadeAction) -> EncodeResult<()> {
        self.single_value(field).encode_reference(name, action)
    }

    /// Delegate to a value type's own single-value encoding.
    pub fn encode_value<V: ValueEncodable + ?Sized>(&mut self, field: &str, value: &V) -> EncodeResult<()> {
        value.encode_value(self.single_value(field))
    }

    /// Remove `field` from the record.
    pub fn encode_nil(&mut self, field: &str) -> EncodeResult<()> {
        self.single_value(field).encode_nil()
    }

    /// An ordered, position-tracked sequence stored under `field`.
    pub fn unkeyed(&mut self, field: &str) -> UnkeyedEncoder<'_> {
        let key = self.key(field);
        let action = key
            .as_deref()
            .map(|k| self.policy.action_for(k))
            .unwrap_or_default();
        UnkeyedEncoder::new(&mut *self.ctx, &mut *self.record, key, action)
    }

    /// A keyed view whose fields are stored as `field.<name>` on the same
    /// record. Used for value types that decompose into several fields but
    /// do not deserve a record of their own.
    pub fn nested_keyed(&mut self, field: &str) -> KeyedEncoder<'_> {
        let prefix = self.full_key(field);
        let suppressed = self.suppressed || self.is_ignored(&prefix);
        KeyedEncoder {
            ctx: &mut *self.ctx,
            record: &mut *self.record,
            policy: self.policy,
            prefix: Some(prefix),
            suppressed,
        }
    }

    /// A keyed view over the same record without any prefix, for handing
    /// the record to a shared base representation.
    pub fn super_encoder(&mut self) -> KeyedEncoder<'_> {
        KeyedEncoder {
            ctx: &mut *self.ctx,
            record: &mut *self.record,
            policy: self.policy,
            prefix: None,
            suppressed: self.suppressed,
        }
    }
}
