//! # AW-03 Index Store
//!
//! Fast lookup from document id to the ledger transaction that anchors it.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Contract
//!
//! - `get` is read-after-write consistent
//! - `insert_if_absent` is the atomic duplicate guard
//! - `update_status` is the only mutation of an indexed record
//! - rows are JSON objects whose fields are all strings
//!
//! ## Module Structure
//!
//! ```text
//! aw-03-index-store/
//! ├── domain/     # IndexStoreError, InsertOutcome, row codec
//! ├── ports/      # IndexStore
//! └── adapters/   # InMemoryIndexStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryIndexStore;
pub use domain::{decode_record, encode_record, record_key, IndexStoreError, InsertOutcome};
pub use ports::IndexStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
