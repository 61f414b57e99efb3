//! # Error Types
//!
//! Defines error types shared across subsystems.

use thiserror::Error;

/// Maximum accepted length of a document identifier.
pub const MAX_DOCUMENT_ID_LEN: usize = 64;

/// Errors raised while validating a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdError {
    /// Identifier is empty after trimming.
    #[error("Document id is empty")]
    Empty,

    /// Identifier exceeds `MAX_DOCUMENT_ID_LEN`.
    #[error("Document id too long: {len} > {max}")]
    TooLong { len: usize, max: usize },

    /// Identifier contains a character outside `[A-Za-z0-9./-]`.
    #[error("Document id contains invalid character {0:?}")]
    InvalidCharacter(char),

    /// Identifier could be interpreted as a path traversal.
    #[error("Document id is not a plain identifier: {0}")]
    PathLike(String),
}
