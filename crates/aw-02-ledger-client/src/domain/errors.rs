//! # Domain Errors
//!
//! Error types for the ledger client.

use thiserror::Error;

/// Ledger client error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger gateway could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout.
    #[error("Ledger request timed out: {0}")]
    Timeout(String),

    /// The gateway answered with an unexpected status.
    #[error("Unexpected HTTP {status} from ledger: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// The gateway answered with a body that cannot be interpreted.
    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),

    /// The fee quote was obtained for a different payload size.
    #[error("Stale fee quote: quoted for {quoted} bytes, payload is {actual} bytes")]
    StaleQuote {
        /// Size the quote was issued for
        quoted: u64,
        /// Size of the payload being signed
        actual: u64,
    },

    /// Transactions without data are not built.
    #[error("Payload is empty")]
    EmptyPayload,

    /// A tag cannot be attached or decoded.
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Tags were written with a schema version this build cannot read.
    #[error("Unsupported tag schema version: {0}")]
    UnsupportedSchema(String),

    /// The ledger does not know the transaction.
    #[error("Transaction not found: {0}")]
    NotFound(String),

    /// Invalid client configuration.
    #[error("Invalid ledger configuration: {0}")]
    Config(String),
}

impl LedgerError {
    /// Whether the error came from the transport rather than from content.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::HttpStatus { .. }
        )
    }
}

/// Truncate response bodies before they end up in errors and logs.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 256;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
