//! # Ports Module
//!
//! Where key material comes from.

pub mod outbound;

pub use outbound::*;
