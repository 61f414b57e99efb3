//! # Domain Module
//!
//! Errors, conditional-write outcomes and the row codec.

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
