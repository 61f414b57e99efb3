//! # Outbound Ports (Driven Ports)
//!
//! The index store contract the publish pipeline depends on.

use async_trait::async_trait;
use shared_types::{DocumentId, DocumentRecord};

use crate::domain::{IndexStoreError, InsertOutcome};

/// Document id to Document Record lookup.
///
/// Production: `RocksDbIndexStore` (node-runtime, `rocksdb` feature)
/// Testing and default runtime: `InMemoryIndexStore`
///
/// ## Consistency
///
/// `get` must observe every `insert_if_absent` that completed before it
/// started (read-after-write). `insert_if_absent` is the duplicate guard: the
/// existence check and the write happen as one atomic step, so two concurrent
/// publishes for one id cannot both be indexed.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Look up a record.
    async fn get(&self, document_id: &DocumentId)
        -> Result<Option<DocumentRecord>, IndexStoreError>;

    /// Write `record` unless a record with the same id exists.
    async fn insert_if_absent(
        &self,
        record: DocumentRecord,
    ) -> Result<InsertOutcome, IndexStoreError>;

    /// Refresh the ledger status of an indexed record. The only mutation
    /// allowed after insertion.
    async fn update_status(
        &self,
        document_id: &DocumentId,
        ledger_status: u16,
    ) -> Result<DocumentRecord, IndexStoreError>;

    /// All records, ordered by document id.
    async fn list(&self) -> Result<Vec<DocumentRecord>, IndexStoreError>;

    /// Whether a record exists.
    async fn exists(&self, document_id: &DocumentId) -> Result<bool, IndexStoreError> {
        Ok(self.get(document_id).await?.is_some())
    }
}
