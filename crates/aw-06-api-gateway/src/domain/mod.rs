//! Domain layer for the API gateway.

pub mod config;
pub mod errors;
pub mod responses;

pub use config::{GatewayConfig, DEFAULT_ALLOWED_ORIGINS};
pub use errors::GatewayError;
pub use responses::*;
