//! High-level SDK for nestrec.
//!
//! Ties the encoder, the reference resolver and a record store together
//! behind one [`Codec`] value configured by a [`CodecConfig`]. This is the
//! main entry point for applications embedding nestrec.

pub mod codec;
pub mod config;
pub mod error;

pub use codec::Codec;
pub use config::CodecConfig;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use nestrec_codec::{
    DecodeError, EncodeError, KeyedDecoder, KeyedEncoder, RecordDecodable, RecordEncodable,
    RecordRepresentable, SingleValueDecoder, SingleValueEncoder, UnkeyedDecoder, UnkeyedEncoder,
    ValueDecodable, ValueEncodable,
};
pub use nestrec_resolve::{RecordFetcher, ResolverConfig};
pub use nestrec_store::{InMemoryRecordStore, RecordStore};
pub use nestrec_transcode::{FileUrl, GeoCoordinate};
pub use nestrec_types::{CascadeAction, FieldValue, Record, RecordId, RecordSet, Reference, Scalar, ZoneId};
