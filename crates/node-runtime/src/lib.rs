//! # Node Runtime Library
//!
//! Exposes the runtime's configuration and wiring for tests. The entry point
//! is the `arxweave-node` binary (`main.rs`).
//!
//! ## Modules
//!
//! - `container/` - `NodeConfig`, environment loading, `SubsystemContainer`
//! - `adapters/` - runtime-only port implementations (RocksDB index store)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod container;

pub use container::{
    load_config, load_config_from, ConfigError, ContainerError, NodeConfig, SubsystemContainer,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
