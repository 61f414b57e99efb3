//! # Subsystem Container
//!
//! Configuration plus the container that owns every subsystem instance.

pub mod config;
pub mod subsystems;

pub use config::{
    load_config, load_config_from, ConfigError, IdentityConfig, NodeConfig, StorageBackend,
    StorageConfig,
};
pub use subsystems::{ContainerError, SubsystemContainer};
