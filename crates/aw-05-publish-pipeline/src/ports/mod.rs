//! # Ports Module
//!
//! - `inbound`: what the pipeline offers (`PublishApi`)
//! - `outbound`: what it drives (re-exported from subsystems 2-4)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
