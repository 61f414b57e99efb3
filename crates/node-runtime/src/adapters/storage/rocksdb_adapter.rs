//! # RocksDB Index Store
//!
//! Persistent implementation of the `IndexStore` port.
//!
//! ## Layout
//!
//! One column family, `documents`, keyed by document id. Values are the
//! string-typed JSON rows produced by `aw_03_index_store::encode_record`.
//!
//! ## Conditional insert
//!
//! RocksDB has no compare-and-set. `insert_if_absent` and `update_status`
//! hold the write half of an `RwLock` across their read and write, so they
//! are atomic against every other caller of the same instance. Only one
//! process may open the directory at a time (RocksDB's own `LOCK` file).
//!
//! ## Blocking I/O
//!
//! Every operation runs on tokio's blocking pool. A slow fsync never holds an
//! executor thread, so callers' timeouts keep firing.

use async_trait::async_trait;
use aw_03_index_store::{
    decode_record, encode_record, record_key, IndexStore, IndexStoreError, InsertOutcome,
};
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use shared_types::{DocumentId, DocumentRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Column family holding document records.
pub const CF_DOCUMENTS: &str = "documents";

/// RocksDB tuning.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each write (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/index"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Config for tests (small buffers, no sync).
    pub fn for_testing(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed index store.
pub struct RocksDbIndexStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

fn backend(context: &str, e: rocksdb::Error) -> IndexStoreError {
    IndexStoreError::Backend(format!("RocksDB {context} failed: {e}"))
}

impl RocksDbIndexStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> Result<Self, IndexStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let mut cf_opts = Options::default();
        cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
        let descriptors = vec![ColumnFamilyDescriptor::new(CF_DOCUMENTS, cf_opts)];

        let db = DB::open_cf_descriptors(&opts, &config.path, descriptors)
            .map_err(|e| backend("open", e))?;
        info!(path = %config.path.display(), "[aw-03] RocksDB index opened");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    fn cf(db: &DB) -> Result<&ColumnFamily, IndexStoreError> {
        db.cf_handle(CF_DOCUMENTS)
            .ok_or_else(|| IndexStoreError::Backend(format!("missing column family {CF_DOCUMENTS}")))
    }

    fn read(db: &DB, document_id: &DocumentId) -> Result<Option<DocumentRecord>, IndexStoreError> {
        let cf = Self::cf(db)?;
        db.get_cf(cf, record_key(document_id))
            .map_err(|e| backend("get", e))?
            .map(|bytes| decode_record(&bytes))
            .transpose()
    }

    fn write(db: &DB, record: &DocumentRecord, sync: bool) -> Result<(), IndexStoreError> {
        let cf = Self::cf(db)?;
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(sync);
        db.put_cf_opt(
            cf,
            record_key(&record.document_id),
            encode_record(record)?,
            &write_opts,
        )
        .map_err(|e| backend("put", e))
    }

    /// Run `op` against the database on the blocking pool.
    async fn blocking<T, F>(&self, op: F) -> Result<T, IndexStoreError>
    where
        F: FnOnce(&RwLock<DB>, bool) -> Result<T, IndexStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let sync = self.config.sync_writes;
        tokio::task::spawn_blocking(move || op(&db, sync))
            .await
            .map_err(|e| IndexStoreError::Backend(format!("RocksDB task failed: {e}")))?
    }
}

#[async_trait]
impl IndexStore for RocksDbIndexStore {
    async fn get(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, IndexStoreError> {
        let document_id = document_id.clone();
        self.blocking(move |db, _| Self::read(&db.read(), &document_id))
            .await
    }

    async fn insert_if_absent(
        &self,
        record: DocumentRecord,
    ) -> Result<InsertOutcome, IndexStoreError> {
        self.blocking(move |db, sync| {
            let db = db.write();
            if let Some(existing) = Self::read(&db, &record.document_id)? {
                debug!(document_id = %record.document_id, "[aw-03] Insert skipped, record exists");
                return Ok(InsertOutcome::AlreadyExists(Box::new(existing)));
            }
            Self::write(&db, &record, sync)?;
            Ok(InsertOutcome::Inserted)
        })
        .await
    }

    async fn update_status(
        &self,
        document_id: &DocumentId,
        ledger_status: u16,
    ) -> Result<DocumentRecord, IndexStoreError> {
        let document_id = document_id.clone();
        self.blocking(move |db, sync| {
            let db = db.write();
            let mut record = Self::read(&db, &document_id)?
                .ok_or_else(|| IndexStoreError::NotFound(document_id.clone()))?;
            record.ledger_status = ledger_status;
            Self::write(&db, &record, sync)?;
            Ok(record)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>, IndexStoreError> {
        self.blocking(|db, _| {
            let db = db.read();
            let cf = Self::cf(&db)?;
            let mut records = Vec::new();
            for item in db.iterator_cf(cf, IteratorMode::Start) {
                let (_, value) = item.map_err(|e| backend("scan", e))?;
                records.push(decode_record(&value)?);
            }
            Ok(records)
        })
        .await
    }
}
