//! # AW-06 API Gateway
//!
//! HTTP surface of the publish pipeline.
//!
//! **Subsystem ID:** 6
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Routes
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | `GET` | `/exists/:id` | `{"arXivID", "exists"}` |
//! | `POST` | `/new` | publish (`arXivID` as JSON or form field) |
//! | `GET` | `/arXivID/:id` | stored record |
//! | `GET` | `/all` | every stored record |
//! | `POST` | `/status/:id` | one ledger status refresh |
//! | `GET` | `/tx/:id` | the record's ledger transaction with decoded tags |
//! | `GET` | `/health` | liveness |
//! | `GET` | `/metrics` | Prometheus text format |
//!
//! A duplicate publish is answered 200 with
//! `{"status": "Bad Request", "msg": "This arXiv entry is already uploaded."}`.
//! Pipeline failures carry `{"status": "Error", "phase", "retryable", "msg"}`
//! with 502 (upstream refused or failed), 504 (timeout), 404 (unknown
//! document) or 500.
//!
//! ## Module Structure
//!
//! ```text
//! aw-06-api-gateway/
//! ├── domain/       # GatewayConfig, GatewayError, response bodies
//! ├── adapters/     # PublishError -> HTTP mapping
//! ├── middleware/   # origin filter, CORS
//! ├── handlers.rs   # route handlers
//! ├── router.rs     # route table
//! └── service.rs    # GatewayService (bind + graceful shutdown)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use adapters::ApiError;
pub use domain::{GatewayConfig, GatewayError};
pub use handlers::AppState;
pub use router::create_router;
pub use service::GatewayService;

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
