//! Value transcoding for nestrec.
//!
//! Maps domain scalar types the store cannot hold natively to store-native
//! [`Scalar`](nestrec_types::Scalar)s and back. Every mapping is
//! deterministic and reversible; a stored value that doesn't fit the
//! requested type fails with [`TranscodeError::TypeMismatch`].
//!
//! Binary payloads are the only conversion with a side effect: each payload
//! is written to its own file by an [`AssetStager`] and stored as a handle.

pub mod asset;
pub mod error;
pub mod geo;
pub mod transcode;

pub use asset::{AssetStager, FileUrl};
pub use error::{TranscodeError, TranscodeResult};
pub use geo::{GeoCoordinate, COORDINATE_SEPARATOR};
pub use transcode::{from_scalars, to_scalars, Transcode};
