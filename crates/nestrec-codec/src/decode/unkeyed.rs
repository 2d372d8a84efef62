use nestrec_transcode::Transcode;
use nestrec_types::{FieldValue, Record, Scalar};

use super::Scope;
use crate::error::{DecodeError, DecodeResult};
use crate::path::PathSegment;
use crate::traits::RecordDecodable;

/// What an unkeyed container walks over, fixed at construction time by
/// the shape of the stored field.
#[derive(Clone, Debug)]
enum Elements<'r> {
    /// Already-resolved records behind a reference list.
    Records(Vec<&'r Record>),
    /// Stored scalars.
    Scalars(&'r [Scalar]),
}

/// Ordered, position-tracked view over a stored sequence.
pub struct UnkeyedDecoder<'r> {
    scope: Scope<'r>,
    elements: Elements<'r>,
    current: usize,
}

impl<'r> UnkeyedDecoder<'r> {
    /// Build over `value`. Reference lists are resolved up front, so a
    /// dangling reference fails here, before any element is decoded.
    pub(crate) fn from_value(scope: Scope<'r>, value: &'r FieldValue) -> DecodeResult<Self> {
        let elements = match value {
            FieldValue::References(refs) => Elements::Records(scope.resolve_all(refs)?),
            FieldValue::List(items) => Elements::Scalars(items),
            other => {
                return Err(DecodeError::mismatch(
                    scope.path_string(),
                    "sequence",
                    other.kind(),
                ))
            }
        };
        Ok(Self {
            scope,
            elements,
            current: 0,
        })
    }

    /// Total number of elements.
    pub fn count(&self) -> usize {
        match &self.elements {
            Elements::Records(records) => records.len(),
            Elements::Scalars(items) => items.len(),
        }
    }

    /// Position of the next element.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.count()
    }

    fn check_not_at_end(&self) -> DecodeResult<()> {
        if self.is_at_end() {
            return Err(DecodeError::EndOfSequence {
                path: self.scope.path_string(),
                count: self.count(),
            });
        }
        Ok(())
    }

    /// Decode the next element as a scalar and advance.
    pub fn next<V: Transcode>(&mut self) -> DecodeResult<V> {
        self.check_not_at_end()?;
        let scope = self.scope.child(PathSegment::Index(self.current));
        let value = match &self.elements {
            Elements::Scalars(items) => V::from_scalar(&items[self.current])
                .map_err(|e| DecodeError::transcode(scope.path_string(), e))?,
            Elements::Records(_) => {
                return Err(DecodeError::mismatch(scope.path_string(), V::EXPECTED, "reference"))
            }
        };
        self.current += 1;
        Ok(value)
    }

    /// Decode the next element's record and advance.
    pub fn next_object<T: RecordDecodable>(&mut self) -> DecodeResult<T> {
        self.check_not_at_end()?;
        let scope = self.scope.child(PathSegment::Index(self.current));
        let value = match &self.elements {
            Elements::Records(records) => scope.decode_record(records[self.current])?,
            Elements::Scalars(items) => {
                return Err(DecodeError::mismatch(
                    scope.path_string(),
                    format!("reference to {}", T::RECORD_TYPE),
                    items[self.current].kind(),
                ))
            }
        };
        self.current += 1;
        Ok(value)
    }
}
