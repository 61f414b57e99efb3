//! # AW-01 Signing Identity
//!
//! Long-lived key material that authorizes ledger writes.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Load an Ed25519 key once at process start (`ARXWEAVE_JWK`, optionally
//!   with `d` split across `ARXWEAVE_JWK_D_<n>`)
//! - Expose signing to the ledger client without exposing the key bytes
//! - Fail fatally at startup when key material is absent or malformed
//!
//! ## Security
//!
//! | Defense | Description |
//! |---------|-------------|
//! | Zeroize | Seed buffers and the signing key are wiped on drop |
//! | Redacted Debug | `Debug` never prints private members |
//! | Cross-check | A JWK `x` must match the key derived from `d` |
//!
//! ## Module Structure
//!
//! ```text
//! aw-01-signing-identity/
//! ├── domain/     # SigningIdentity, Jwk, IdentityError
//! ├── ports/      # KeySource
//! ├── adapters/   # EnvKeySource, StaticKeySource
//! └── service.rs  # load_identity
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{EnvKeySource, StaticKeySource};
pub use domain::{
    verify_owner_signature, IdentityError, Jwk, SigningIdentity, ED25519_KEY_LEN, SIGNATURE_LEN,
};
pub use ports::{KeySource, JWK_D_PART_PREFIX, JWK_VARIABLE};
pub use service::load_identity;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
