//! # Algorithms
//!
//! Pure transaction construction.

pub mod signing;

pub use signing::{build_and_sign, signature_preimage, transaction_id, verify_transaction};
