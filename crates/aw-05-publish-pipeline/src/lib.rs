//! # AW-05 Publish Pipeline
//!
//! Publishes a document to the ledger exactly once and records the
//! resulting transaction in the index.
//!
//! **Subsystem ID:** 5  
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## State Machine
//!
//! ```text
//! NEW ─► CHECKED ─► FETCHED ─► PRICED ─► SIGNED ─► BROADCAST ─► INDEXED
//!           │
//!           └─► REJECTED_DUPLICATE        (any non-terminal) ─► FAILED
//! ```
//!
//! ## Guarantees
//!
//! - A record is indexed at most once per document id, only after the
//!   network accepted the transaction (200 or 208)
//! - The fee is quoted for the exact payload that gets signed
//! - A rejected broadcast writes nothing
//! - An index failure after broadcast is reported as a reconciliation gap,
//!   never as a generic error
//!
//! Confirmation is tracked out-of-band by `ConfirmationWatcher`.
//!
//! ## Module Structure
//!
//! ```text
//! aw-05-publish-pipeline/
//! ├── domain/       # PublishState, PublishRun, PublishError, PipelineConfig
//! ├── ports/        # PublishApi (inbound), subsystem traits (outbound)
//! ├── service.rs    # PublishService
//! └── watcher.rs    # ConfirmationWatcher
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;
pub mod watcher;

pub use domain::{
    PipelineConfig, PollPolicy, PublishError, PublishOutcome, PublishPhase, PublishReceipt,
    PublishRun, PublishState, WatchOutcome,
};
pub use aw_02_ledger_client::StoredTransaction;
pub use ports::PublishApi;
pub use service::PublishService;
pub use watcher::ConfirmationWatcher;

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
