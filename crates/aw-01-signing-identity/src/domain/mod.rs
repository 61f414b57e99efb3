//! # Domain Module
//!
//! Key material, JWK parsing and identity errors.

pub mod errors;
pub mod identity;
pub mod jwk;

pub use errors::*;
pub use identity::*;
pub use jwk::*;
