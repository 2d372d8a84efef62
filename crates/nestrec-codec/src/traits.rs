//! Capability traits domain types implement to take part in encoding and
//! decoding.

use nestrec_types::CascadeAction;

use crate::decode::{KeyedDecoder, SingleValueDecoder};
use crate::encode::{KeyedEncoder, SingleValueEncoder};
use crate::error::{DecodeResult, EncodeResult};

/// A domain type that is stored as its own record.
///
/// The identifier must be known before encoding starts: children are
/// linked to it while the parent's fields are still being written.
pub trait RecordRepresentable {
    /// Record type tag, constant per type.
    const RECORD_TYPE: &'static str;

    /// Stable identifier, unique within the store.
    fn record_name(&self) -> &str;

    /// Fields that are never written. A field listed here is skipped
    /// silently, including any nested objects it would have produced.
    fn ignored_fields(&self) -> &[&str] {
        &[]
    }

    /// Cascade action for references written under `field`.
    fn reference_action(&self, _field: &str) -> CascadeAction {
        CascadeAction::default()
    }
}

/// Field-by-field encoding into a keyed container.
pub trait RecordEncodable: RecordRepresentable {
    fn encode_fields(&self, container: &mut KeyedEncoder<'_>) -> EncodeResult<()>;
}

/// Field-by-field decoding from a keyed container.
///
/// Implementations should collect every field first and only then build
/// the value; any error aborts the whole decode.
pub trait RecordDecodable: RecordRepresentable + Sized {
    fn decode_fields(container: &KeyedDecoder<'_>) -> DecodeResult<Self>;
}

/// A value that is stored by delegating to a single inner value (for
/// example a newtype around a string or around a nested object).
pub trait ValueEncodable {
    fn encode_value(&self, container: SingleValueEncoder<'_>) -> EncodeResult<()>;
}

/// Decoding counterpart of [`ValueEncodable`].
pub trait ValueDecodable: Sized {
    fn decode_value(container: SingleValueDecoder<'_>) -> DecodeResult<Self>;
}

/// Per-owner field rules applied by the encode-side containers.
pub(crate) trait FieldPolicy {
    fn is_ignored(&self, field: &str) -> bool;
    fn action_for(&self, field: &str) -> CascadeAction;
}

impl<T: RecordRepresentable> FieldPolicy for T {
    fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields().contains(&field)
    }

    fn action_for(&self, field: &str) -> CascadeAction {
        self.reference_action(field)
    }
}
