//! # Adapters
//!
//! `KeySource` implementations.

pub mod sources;

pub use sources::{EnvKeySource, StaticKeySource};
