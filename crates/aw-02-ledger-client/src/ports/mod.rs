//! # Ports Module
//!
//! The ledger client port and its mock.

pub mod outbound;

pub use outbound::*;
