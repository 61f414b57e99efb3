//! # Subsystem Container
//!
//! Builds every subsystem from `NodeConfig` and wires them into the publish
//! pipeline.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Signing Identity (loaded before the container, fatal on error)
//! Level 1: Ledger Client, Index Store, Metadata Fetcher
//! Level 2: Publish Pipeline (depends on Level 0-1)
//! Level 3: API Gateway (depends on Level 2)
//! ```
//!
//! ## Thread Safety
//!
//! - All subsystems are shared through `Arc`
//! - Confirmation watches observe one shutdown channel owned by the container

use std::sync::Arc;

use aw_01_signing_identity::SigningIdentity;
use aw_02_ledger_client::{HttpLedgerClient, LedgerClient, LedgerError, Winston};
use aw_03_index_store::{IndexStore, IndexStoreError, InMemoryIndexStore};
use aw_04_metadata_fetcher::{ArxivFetcher, FetchError, MetadataFetcher};
use aw_05_publish_pipeline::{PublishApi, PublishService};
use aw_06_api_gateway::{GatewayError, GatewayService};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::container::config::{NodeConfig, StorageBackend};

/// Errors raised while building subsystems.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The ledger client could not be created.
    #[error("Ledger client: {0}")]
    Ledger(#[from] LedgerError),

    /// The metadata fetcher could not be created.
    #[error("Metadata fetcher: {0}")]
    Fetcher(#[from] FetchError),

    /// The index store could not be opened.
    #[error("Index store: {0}")]
    Store(#[from] IndexStoreError),

    /// The gateway rejected its configuration.
    #[error("API gateway: {0}")]
    Gateway(#[from] GatewayError),

    /// The configured storage backend is not compiled in.
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    /// Node configuration.
    pub config: NodeConfig,

    // =========================================================================
    // LEVEL 0
    // =========================================================================
    /// Signing Identity (Subsystem 1)
    pub identity: Arc<SigningIdentity>,

    // =========================================================================
    // LEVEL 1
    // =========================================================================
    /// Ledger Client (Subsystem 2)
    pub ledger: Arc<dyn LedgerClient>,
    /// Index Store (Subsystem 3)
    pub store: Arc<dyn IndexStore>,
    /// Metadata Fetcher (Subsystem 4)
    pub fetcher: Arc<dyn MetadataFetcher>,

    // =========================================================================
    // LEVEL 2
    // =========================================================================
    /// Publish Pipeline (Subsystem 5)
    pub pipeline: Arc<PublishService>,

    shutdown_tx: watch::Sender<bool>,
}

impl SubsystemContainer {
    /// Build production adapters from configuration.
    pub fn new(config: NodeConfig, identity: Arc<SigningIdentity>) -> Result<Self, ContainerError> {
        let ledger: Arc<dyn LedgerClient> = Arc::new(HttpLedgerClient::new(config.ledger.clone())?);
        let fetcher: Arc<dyn MetadataFetcher> = Arc::new(ArxivFetcher::new(config.arxiv.clone())?);
        let store = open_store(&config)?;

        info!(
            ledger = %config.ledger.gateway_url,
            arxiv = %config.arxiv.api_url,
            storage = ?config.storage.backend,
            "[node] Subsystems created"
        );
        Ok(Self::from_parts(config, identity, store, fetcher, ledger))
    }

    /// Wire already-built adapters.
    pub fn from_parts(
        config: NodeConfig,
        identity: Arc<SigningIdentity>,
        store: Arc<dyn IndexStore>,
        fetcher: Arc<dyn MetadataFetcher>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pipeline = PublishService::new(
            store.clone(),
            fetcher.clone(),
            ledger.clone(),
            identity.clone(),
            config.pipeline.clone(),
        )
        .with_shutdown(shutdown_rx);

        Self {
            config,
            identity,
            ledger,
            store,
            fetcher,
            pipeline: Arc::new(pipeline),
            shutdown_tx,
        }
    }

    /// API Gateway (Subsystem 6) in front of the pipeline.
    pub fn gateway(&self) -> Result<GatewayService, ContainerError> {
        let api: Arc<dyn PublishApi> = self.pipeline.clone();
        Ok(GatewayService::new(self.config.gateway.clone(), api)?)
    }

    /// Query the wallet balance and log it. A zero balance is logged as a
    /// warning since every publish would be refused. Lookup failures are
    /// logged and otherwise ignored.
    pub async fn report_balance(&self) -> Option<Winston> {
        let address = self.identity.address();
        let call = self.ledger.balance(address);
        match tokio::time::timeout(self.config.pipeline.ledger_timeout, call).await {
            Ok(Ok(balance)) if balance.is_zero() => {
                warn!(address, "[node] Wallet balance is zero, publishes will be rejected");
                Some(balance)
            }
            Ok(Ok(balance)) => {
                info!(address, balance = %balance, "[node] Wallet balance");
                Some(balance)
            }
            Ok(Err(e)) => {
                warn!(address, error = %e, "[node] Wallet balance unavailable");
                None
            }
            Err(_) => {
                warn!(address, "[node] Wallet balance lookup timed out");
                None
            }
        }
    }

    /// Signal confirmation watches to stop.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}

fn open_store(config: &NodeConfig) -> Result<Arc<dyn IndexStore>, ContainerError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("[node] Using in-memory index, records are lost on restart");
            Ok(Arc::new(InMemoryIndexStore::new()))
        }
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => {
            use crate::adapters::storage::{RocksDbConfig, RocksDbIndexStore};
            let rocks = RocksDbConfig {
                path: config.storage.data_dir.clone(),
                ..RocksDbConfig::default()
            };
            Ok(Arc::new(RocksDbIndexStore::open(rocks)?))
        }
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => Err(ContainerError::BackendUnavailable("rocksdb".into())),
    }
}
