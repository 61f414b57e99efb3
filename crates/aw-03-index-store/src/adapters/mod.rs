//! # Adapters
//!
//! In-process `IndexStore` implementation.

pub mod memory;

pub use memory::InMemoryIndexStore;
