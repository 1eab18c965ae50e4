//! Named-protocol store
//!
//! Persists a `name -> protocol` mapping as a JSON file so protocols can be
//! reused as `#name/text` requests. The store is owned by the caller and
//! lent to the engine only as a read-only [`ccps_core::ProtocolSource`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod store;

pub use error::StoreError;
pub use store::{CorruptedRecord, DEFAULT_STORE_PATH, ProtocolStore, split_entry};
