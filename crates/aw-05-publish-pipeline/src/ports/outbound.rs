//! # Outbound Ports
//!
//! The pipeline drives three subsystems. Their traits are owned by the
//! subsystems themselves and re-exported here so adapters are wired against
//! one import path.

pub use aw_02_ledger_client::LedgerClient;
pub use aw_03_index_store::IndexStore;
pub use aw_04_metadata_fetcher::MetadataFetcher;
