//! In-memory index store.
//!
//! A `BTreeMap` behind a `parking_lot::RwLock`. The conditional insert holds
//! the write lock across the check and the write, which makes it atomic for
//! all callers sharing the instance.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{DocumentId, DocumentRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::domain::{IndexStoreError, InsertOutcome};
use crate::ports::IndexStore;

/// Index store kept in process memory.
#[derive(Default)]
pub struct InMemoryIndexStore {
    records: RwLock<BTreeMap<DocumentId, DocumentRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    delay: RwLock<Option<Duration>>,
    inserts: AtomicUsize,
}

impl InMemoryIndexStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = DocumentRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write();
            for record in records {
                map.insert(record.document_id.clone(), record);
            }
        }
        store
    }

    /// Make every read fail with a backend error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every operation.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Number of successful inserts.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    async fn pause(&self) {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_reads(&self) -> Result<(), IndexStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(IndexStoreError::Backend("read failure injected".into()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), IndexStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(IndexStoreError::Backend("write failure injected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn get(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, IndexStoreError> {
        self.pause().await;
        self.check_reads()?;
        Ok(self.records.read().get(document_id).cloned())
    }

    async fn insert_if_absent(
        &self,
        record: DocumentRecord,
    ) -> Result<InsertOutcome, IndexStoreError> {
        self.pause().await;
        self.check_writes()?;
        let mut records = self.records.write();
        if let Some(existing) = records.get(&record.document_id) {
            debug!(document_id = %record.document_id, "[aw-03] Insert skipped, record exists");
            return Ok(InsertOutcome::AlreadyExists(Box::new(existing.clone())));
        }
        records.insert(record.document_id.clone(), record);
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(InsertOutcome::Inserted)
    }

    async fn update_status(
        &self,
        document_id: &DocumentId,
        ledger_status: u16,
    ) -> Result<DocumentRecord, IndexStoreError> {
        self.pause().await;
        self.check_writes()?;
        let mut records = self.records.write();
        let record = records
            .get_mut(document_id)
            .ok_or_else(|| IndexStoreError::NotFound(document_id.clone()))?;
        record.ledger_status = ledger_status;
        Ok(record.clone())
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>, IndexStoreError> {
        self.pause().await;
        self.check_reads()?;
        Ok(self.records.read().values().cloned().collect())
    }
}
