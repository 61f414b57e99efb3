//! # Domain Errors
//!
//! Error types for the index store.

use shared_types::DocumentId;
use thiserror::Error;

/// Index store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexStoreError {
    /// The backing store failed or is unreachable.
    #[error("Index store backend error: {0}")]
    Backend(String),

    /// A stored row cannot be encoded or decoded.
    #[error("Index record serialization error: {0}")]
    Serialization(String),

    /// `update_status` targeted a document that was never indexed.
    #[error("Document not indexed: {0}")]
    NotFound(DocumentId),
}
