use nestrec_transcode::Transcode;
use nestrec_types::{FieldValue, Reference};

use super::{Scope, UnkeyedDecoder};
use crate::error::{DecodeError, DecodeResult};
use crate::traits::{RecordDecodable, ValueDecodable};

/// Pass-through view over the value of one field.
pub struct SingleValueDecoder<'r> {
    scope: Scope<'r>,
    value: &'r FieldValue,
}

impl<'r> SingleValueDecoder<'r> {
    pub(crate) fn new(scope: Scope<'r>, value: &'r FieldValue) -> Self {
        Self { scope, value }
    }

    /// The stored value as-is.
    pub fn value(&self) -> &'r FieldValue {
        self.value
    }

    fn mismatch(&self, expected: &str) -> DecodeError {
        DecodeError::mismatch(self.scope.path_string(), expected, self.value.kind())
    }

    pub fn decode<V: Transcode>(self) -> DecodeResult<V> {
        match self.value {
            FieldValue::Scalar(scalar) => V::from_scalar(scalar)
                .map_err(|e| DecodeError::transcode(self.scope.path_string(), e)),
            _ => Err(self.mismatch(V::EXPECTED)),
        }
    }

    pub fn decode_list<V: Transcode>(self) -> DecodeResult<Vec<V>> {
        match self.value {
            FieldValue::List(items) => items
                .iter()
                .map(|s| {
                    V::from_scalar(s).map_err(|e| DecodeError::transcode(self.scope.path_string(), e))
                })
                .collect(),
            // An empty sequence carries no element kind.
            FieldValue::References(refs) if refs.is_empty() => Ok(Vec::new()),
            _ => Err(self.mismatch("list")),
        }
    }

    pub fn decode_object<T: RecordDecodable>(self) -> DecodeResult<T> {
        let reference = self.reference()?;
        let record = self.scope.resolve(reference)?;
        self.scope.decode_record(record)
    }

    pub fn decode_objects<T: RecordDecodable>(self) -> DecodeResult<Vec<T>> {
        let mut sequence = self.unkeyed()?;
        let mut values = Vec::with_capacity(sequence.count());
        while !sequence.is_at_end() {
            values.push(sequence.next_object()?);
        }
        Ok(values)
    }

    pub fn reference(&self) -> DecodeResult<&'r Reference> {
        match self.value {
            FieldValue::Reference(reference) => Ok(reference),
            _ => Err(self.mismatch("reference")),
        }
    }

    pub fn references(&self) -> DecodeResult<&'r [Reference]> {
        match self.value {
            FieldValue::Reference(_) | FieldValue::References(_) => Ok(self.value.references()),
            FieldValue::List(items) if items.is_empty() => Ok(&[]),
            _ => Err(self.mismatch("reference list")),
        }
    }

    pub fn decode_value<V: ValueDecodable>(self) -> DecodeResult<V> {
        V::decode_value(self)
    }

    /// Ordered view over a stored sequence of references or scalars.
    pub fn unkeyed(self) -> DecodeResult<UnkeyedDecoder<'r>> {
        UnkeyedDecoder::from_value(self.scope, self.value)
    }
}
