//! # Adapters
//!
//! Network implementation of the `LedgerClient` port.

pub mod http_client;

pub use http_client::HttpLedgerClient;
