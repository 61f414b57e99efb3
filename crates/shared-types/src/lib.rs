//! # Shared Types Crate
//!
//! Document record model shared by the publish pipeline, the index store,
//! the ledger client and the gateway.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the persisted record shape is defined once here.
//! - **Validated Identifiers**: a `DocumentId` can only be obtained through
//!   `DocumentId::parse`, so every subsystem receives a well-formed key.
//! - **String-typed Persistence**: every persisted field serializes as a JSON
//!   string, matching the index store's native row representation.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
