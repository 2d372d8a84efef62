use nestrec_transcode::Transcode;
use nestrec_types::{CascadeAction, FieldValue, Record, Reference};

use super::EncodeContext;
use crate::error::EncodeResult;
use crate::path::PathSegment;
use crate::traits::{RecordEncodable, ValueEncodable};

/// Pass-through view over exactly one field of the record being produced.
///
/// Consumed by the first write. A slot for an ignored field accepts every
/// write and stores nothing.
pub struct SingleValueEncoder<'a> {
    ctx: &'a mut EncodeContext,
    record: &'a mut Record,
    key: Option<String>,
    action: CascadeAction,
}

impl<'a> SingleValueEncoder<'a> {
    pub(crate) fn new(
        ctx: &'a mut EncodeContext,
        record: &'a mut Record,
        key: Option<String>,
        action: CascadeAction,
    ) -> Self {
        Self {
            ctx,
            record,
            key,
            action,
        }
    }

    /// The store key this slot writes to; `None` when the field is ignored.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn encode<V: Transcode>(self, value: &V) -> EncodeResult<()> {
        let Some(key) = self.key else {
            return Ok(());
        };
        let scalar = self.ctx.transcode(&key, value)?;
        self.record.set(key, FieldValue::Scalar(scalar));
        Ok(())
    }

    pub fn encode_list<V: Transcode>(self, values: &[V]) -> EncodeResult<()> {
        let Some(key) = self.key else {
            return Ok(());
        };
        let scalars = self.ctx.transcode_all(&key, values)?;
        self.record.set(key, FieldValue::List(scalars));
        Ok(())
    }

    pub fn encode_object<T: RecordEncodable>(self, value: &T) -> EncodeResult<()> {
        let Some(key) = self.key else {
            return Ok(());
        };
        self.ctx.push_path(PathSegment::Field(key.clone()));
        let target = self.ctx.encode_record(value);
        self.ctx.pop_path();
        let reference = Reference::with_action(target?, self.action);
        self.record.set(key, FieldValue::Reference(reference));
        Ok(())
    }

    pub fn encode_objects<T: RecordEncodable>(self, values: &[T]) -> EncodeResult<()> {
        let Some(key) = self.key else {
            return Ok(());
        };
        self.ctx.push_path(PathSegment::Field(key.clone()));
        let mut references = Vec::with_capacity(values.len());
        let mut result = Ok(());
        for (i, value) in values.iter().enumerate() {
            self.ctx.push_path(PathSegment::Index(i));
            let target = self.ctx.encode_record(value);
            self.ctx.pop_path();
            match target {
                Ok(target) => references.push(Reference::with_action(target, self.action)),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        self.ctx.pop_path();
        result?;
        self.record.set(key, FieldValue::References(references));
        Ok(())
    }

    /// Link to an existing record by name, without encoding it.
    pub fn encode_reference(self, name: &str, action: CascadeAction) -> EncodeResult<()> {
        let Some(key) = self.key else {
            return Ok(());
        };
        let target = self.ctx.record_id(name);
        self.record
            .set(key, FieldValue::Reference(Reference::with_action(target, action)));
        Ok(())
    }

    /// Hand the slot to another value's single-value encoding.
    pub fn encode_value<V: ValueEncodable + ?Sized>(self, value: &V) -> EncodeResult<()> {
        value.encode_value(self)
    }

    pub fn encode_nil(self) -> EncodeResult<()> {
        if let Some(key) = self.key {
            self.record.remove(&key);
        }
        Ok(())
    }
}
