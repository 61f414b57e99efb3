//! # Domain Errors
//!
//! Failures while loading or using the signing identity. Every loading error
//! is fatal at startup: the process cannot authorize ledger writes without a
//! key.

use thiserror::Error;

/// Signing identity error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// A required configuration variable is absent.
    #[error("Missing key material: {0} is not set")]
    MissingVariable(String),

    /// The JWK document is not valid JSON or lacks required members.
    #[error("Malformed JWK: {0}")]
    MalformedJwk(String),

    /// The JWK describes a key type other than OKP/Ed25519.
    #[error("Unsupported key type: kty={kty}, crv={crv}")]
    UnsupportedKeyType {
        /// JWK `kty` member
        kty: String,
        /// JWK `crv` member
        crv: String,
    },

    /// A key field is not valid base64url.
    #[error("Invalid base64url in JWK field '{field}': {reason}")]
    InvalidEncoding {
        /// Field name
        field: String,
        /// Decoder message
        reason: String,
    },

    /// A decoded key field has the wrong size.
    #[error("JWK field '{field}' must be {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Field name
        field: String,
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// The public key in the JWK does not belong to the private scalar.
    #[error("JWK public key 'x' does not match private key 'd'")]
    PublicKeyMismatch,
}
