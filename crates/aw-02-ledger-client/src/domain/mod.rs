//! # Domain Module
//!
//! Ledger transaction, tag schema, fees and errors.

pub mod config;
pub mod errors;
pub mod tags;
pub mod transaction;
pub mod value_objects;

pub use config::*;
pub use errors::*;
pub use tags::*;
pub use transaction::*;
pub use value_objects::*;
