//! # Domain Errors
//!
//! Error types for metadata and content retrieval.

use shared_types::DocumentId;
use thiserror::Error;

/// Metadata fetcher error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The archive has no entry for the id.
    #[error("Document not found in archive: {0}")]
    NotFound(DocumentId),

    /// The archive could not be reached.
    #[error("Archive network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout.
    #[error("Archive request timed out: {0}")]
    Timeout(String),

    /// The archive answered with a non-success status.
    #[error("Archive returned HTTP {status} for {url}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The metadata feed could not be parsed.
    #[error("Malformed archive feed: {0}")]
    Parse(String),

    /// The content download returned no bytes.
    #[error("Document content is empty")]
    EmptyContent,

    /// The content exceeds the configured limit.
    #[error("Document content too large: {size} > {max} bytes")]
    ContentTooLarge {
        /// Observed size
        size: u64,
        /// Configured maximum
        max: u64,
    },

    /// Invalid fetcher configuration.
    #[error("Invalid fetcher configuration: {0}")]
    Config(String),
}
