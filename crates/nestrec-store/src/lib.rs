//! Record storage for nestrec.
//!
//! Stores are flat: they know records, fields and references, and nothing
//! about the object graphs those records were encoded from. The only graph
//! behavior a store has is cascade deletion along references marked
//! [`CascadeAction::DeleteWithParent`](nestrec_types::CascadeAction).

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
