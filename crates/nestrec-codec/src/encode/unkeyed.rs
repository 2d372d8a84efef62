use nestrec_transcode::Transcode;
use nestrec_types::{CascadeAction, FieldValue, Record, Reference};

use super::EncodeContext;
use crate::error::{EncodeError, EncodeResult};
use crate::path::PathSegment;
use crate::traits::RecordEncodable;

/// Ordered, position-tracked sequence written under one field.
///
/// The field is written through on every push. The first element decides
/// whether the sequence holds references or scalars; mixing the two fails
/// with [`EncodeError::MixedSequence`].
pub struct UnkeyedEncoder<'a> {
    ctx: &'a mut EncodeContext,
    record: &'a mut Record,
    key: Option<String>,
    action: CascadeAction,
    count: usize,
}

impl<'a> UnkeyedEncoder<'a> {
    pub(crate) fn new(
        ctx: &'a mut EncodeContext,
        record: &'a mut Record,
        key: Option<String>,
        action: CascadeAction,
    ) -> Self {
        if let Some(key) = &key {
            record.set(key.clone(), FieldValue::List(Vec::new()));
        }
        Self {
            ctx,
            record,
            key,
            action,
            count: 0,
        }
    }

    /// Number of elements pushed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Append a scalar.
    pub fn push<V: Transcode>(&mut self, value: &V) -> EncodeResult<()> {
        let Some(key) = self.key.as_deref() else {
            return Ok(());
        };
        let scalar = self.ctx.transcode(key, value)?;
        let slot = self.slot()?;
        if matches!(&*slot, FieldValue::References(refs) if refs.is_empty()) {
            *slot = FieldValue::List(Vec::new());
        }
        let pushed = match slot {
            FieldValue::List(items) => {
                items.push(scalar);
                true
            }
            _ => false,
        };
        if !pushed {
            return Err(self.mixed());
        }
        self.count += 1;
        Ok(())
    }

    /// Encode `value` as its own record and append a link to it.
    pub fn push_object<T: RecordEncodable>(&mut self, value: &T) -> EncodeResult<()> {
        let Some(key) = self.key.clone() else {
            return Ok(());
        };
        self.ctx.push_path(PathSegment::Field(key));
        self.ctx.push_path(PathSegment::Index(self.count));
        let target = self.ctx.encode_record(value);
        self.ctx.pop_path();
        self.ctx.pop_path();
        let reference = Reference::with_action(target?, self.action);

        let slot = self.slot()?;
        if matches!(&*slot, FieldValue::List(items) if items.is_empty()) {
            *slot = FieldValue::References(Vec::new());
        }
        let pushed = match slot {
            FieldValue::References(refs) => {
                refs.push(reference);
                true
            }
            _ => false,
        };
        if !pushed {
            return Err(self.mixed());
        }
        self.count += 1;
        Ok(())
    }

    fn slot(&mut self) -> EncodeResult<&mut FieldValue> {
        let key = self.key.as_deref().unwrap_or_default();
        if !self.record.contains(key) {
            // Cleared by a nested write under the same name; start over.
            self.record.set(key, FieldValue::List(Vec::new()));
        }
        self.record
            .fields
            .get_mut(key)
            .ok_or_else(|| EncodeError::MixedSequence {
                path: self.ctx.path().with_field(key),
            })
    }

    fn mixed(&self) -> EncodeError {
        EncodeError::MixedSequence {
            path: self
                .ctx
                .path()
                .with_field(self.key.as_deref().unwrap_or_default()),
        }
    }
}
