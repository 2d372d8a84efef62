//! Object graph to flat record codec for nestrec.
//!
//! Domain types opt in by implementing [`RecordRepresentable`] plus
//! [`RecordEncodable`] and/or [`RecordDecodable`]. Each type writes and
//! reads its own fields through a [`KeyedEncoder`] / [`KeyedDecoder`],
//! stating per field whether the value is a scalar, a scalar list, a nested
//! object or a sequence of nested objects.
//!
//! # Encoding
//!
//! ```text
//! School ─┬─ students[0]: Person ── books[0]: Book
//!         └─ students[1]: Person ─┘ (same Book)
//!
//!   → [Book, Person, Person, School]   (depth-first, root last, unique)
//! ```
//!
//! # Decoding
//!
//! The decoder works over a closed [`RecordSet`](nestrec_types::RecordSet)
//! and follows references by record name. Missing fields, wrong shapes and
//! dangling references all surface as [`DecodeError`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod path;
pub mod traits;

#[cfg(test)]
pub(crate) mod fixtures;

pub use decode::{KeyedDecoder, RecordDecoder, SingleValueDecoder, UnkeyedDecoder};
pub use encode::{KeyedEncoder, RecordEncoder, SingleValueEncoder, UnkeyedEncoder};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use path::{CodingPath, PathSegment};
pub use traits::{RecordDecodable, RecordEncodable, RecordRepresentable, ValueDecodable, ValueEncodable};
