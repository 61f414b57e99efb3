//! # Arxweave Test Suite
//!
//! Cross-subsystem flows run against the production adapters. The arXiv API
//! and the ledger gateway are replaced by local axum servers; everything else
//! (HTTP clients, signing, index, pipeline, gateway) is the real code.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs              # Stub archive, stub ledger, node harness
//! └── integration/
//!     ├── publish_flows.rs     # Pipeline over real HTTP adapters
//!     ├── http_flows.rs        # Full node behind its HTTP surface
//!     └── confirmation_flows.rs# Confirmation polling and cancellation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aw-tests
//! cargo test -p aw-tests integration::http_flows
//! ```

pub mod fixtures;
pub mod integration;
