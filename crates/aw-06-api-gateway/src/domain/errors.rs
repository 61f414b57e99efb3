//! # Domain Errors

use thiserror::Error;

/// API gateway error types.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid configuration.
    #[error("Invalid gateway configuration: {0}")]
    Config(String),

    /// The listen socket could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: std::net::SocketAddr,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The server stopped with an error.
    #[error("HTTP server error: {0}")]
    Server(#[from] std::io::Error),
}
