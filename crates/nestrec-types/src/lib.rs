//! Record model for nestrec.
//!
//! A document store that only understands flat key/value maps and
//! one-directional foreign keys can't hold an object graph directly. This
//! crate defines the flat side of the mapping: the [`Record`] that the
//! encoder produces and the decoder consumes.
//!
//! # Key Types
//!
//! - [`RecordId`] -- record name plus the [`ZoneId`] (store partition) it lives in
//! - [`Record`] -- type tag + identity + field map
//! - [`FieldValue`] -- scalar, scalar list, reference, or reference list
//! - [`Reference`] -- foreign key carrying a [`CascadeAction`]
//! - [`RecordSet`] -- ordered records, unique by name, first occurrence wins

pub mod error;
pub mod identity;
pub mod record;
pub mod set;
pub mod value;

pub use error::{FetchError, TypeError};
pub use identity::{RecordId, ZoneId};
pub use record::Record;
pub use set::RecordSet;
pub use value::{AssetHandle, CascadeAction, FieldValue, Reference, Scalar};
