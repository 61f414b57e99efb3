//! # Domain Module
//!
//! State machine, run entity, outcomes, errors and configuration.

pub mod config;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
