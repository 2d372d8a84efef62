//! Reference resolution for nestrec.
//!
//! Decoding needs a closed record set, but a store hands out records one
//! batch at a time. The [`ReferenceResolver`] starts from a root record and
//! fetches whatever its references point at, level by level, until nothing
//! new is referenced. Every round issues exactly one batched fetch through a
//! [`RecordFetcher`], and no record is ever requested twice, so reference
//! cycles terminate.

pub mod config;
pub mod fetcher;
pub mod resolver;

pub use config::ResolverConfig;
pub use fetcher::RecordFetcher;
pub use resolver::{ReferenceResolver, Resolution};
