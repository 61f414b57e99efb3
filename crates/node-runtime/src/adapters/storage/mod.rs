//! # Index Storage Backends
//!
//! Enable the `rocksdb` feature for the persistent backend:
//!
//! ```toml
//! node-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Without it the runtime serves from `InMemoryIndexStore`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbIndexStore, CF_DOCUMENTS};

pub use aw_03_index_store::InMemoryIndexStore;
