//! # Inbound Ports
//!
//! API trait defining what the Publish Pipeline can do.

use async_trait::async_trait;
use aw_02_ledger_client::StoredTransaction;
use shared_types::{DocumentId, DocumentRecord};

use crate::domain::{PublishError, PublishOutcome};

/// Publish pipeline API - inbound port.
#[async_trait]
pub trait PublishApi: Send + Sync {
    /// Whether a record exists for `document_id`.
    async fn check(&self, document_id: &DocumentId) -> Result<bool, PublishError>;

    /// Publish `document_id` once. A second call for the same id returns
    /// `AlreadyPublished` without side effects.
    async fn publish(&self, document_id: &DocumentId) -> Result<PublishOutcome, PublishError>;

    /// Stored record for `document_id`.
    async fn get(&self, document_id: &DocumentId)
        -> Result<Option<DocumentRecord>, PublishError>;

    /// Every stored record.
    async fn list(&self) -> Result<Vec<DocumentRecord>, PublishError>;

    /// Poll the ledger once for the record's transaction and persist the
    /// observed status.
    async fn refresh_status(&self, document_id: &DocumentId)
        -> Result<DocumentRecord, PublishError>;

    /// The ledger transaction the record references, read back with its tags.
    async fn transaction(&self, document_id: &DocumentId)
        -> Result<StoredTransaction, PublishError>;
}
