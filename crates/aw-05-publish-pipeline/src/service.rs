//! # Publish Service
//!
//! Drives one `PublishRun` per request through the state machine:
//!
//! ```text
//! check ──► fetch ──► quote ──► sign ──► broadcast ──► index
//!   │                                                  (insert_if_absent)
//!   └─ record exists ─► AlreadyPublished
//! ```
//!
//! Each external call is bounded by its configured timeout; an elapsed timeout
//! becomes the failure variant of the phase it interrupted. Nothing is retried
//! here. Every failure before the index write leaves no trace, so the caller
//! may rerun the whole pipeline.

use arxweave_telemetry::{
    HistogramTimer, PUBLISH_DURATION, PUBLISH_FAILURES, PUBLISH_OUTCOMES, RECONCILIATION_GAPS,
};
use async_trait::async_trait;
use aw_01_signing_identity::SigningIdentity;
use aw_02_ledger_client::{BroadcastOutcome, DocumentTags, LedgerError, StoredTransaction};
use aw_03_index_store::InsertOutcome;
use aw_04_metadata_fetcher::FetchError;
use shared_types::{DocumentId, DocumentRecord, LedgerTxId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, error, info, warn, Instrument};

use crate::domain::{
    PipelineConfig, PublishError, PublishOutcome, PublishReceipt, PublishRun, PublishState,
};
use crate::ports::{IndexStore, LedgerClient, MetadataFetcher, PublishApi};
use crate::watcher::ConfirmationWatcher;

/// The publish-once pipeline.
pub struct PublishService {
    store: Arc<dyn IndexStore>,
    fetcher: Arc<dyn MetadataFetcher>,
    ledger: Arc<dyn LedgerClient>,
    identity: Arc<SigningIdentity>,
    config: PipelineConfig,
    shutdown: watch::Receiver<bool>,
}

impl PublishService {
    /// Wire the pipeline. Confirmation watches spawned by this service never
    /// observe a cancellation; use `with_shutdown` to stop them.
    pub fn new(
        store: Arc<dyn IndexStore>,
        fetcher: Arc<dyn MetadataFetcher>,
        ledger: Arc<dyn LedgerClient>,
        identity: Arc<SigningIdentity>,
        config: PipelineConfig,
    ) -> Self {
        let (_, shutdown) = watch::channel(false);
        Self {
            store,
            fetcher,
            ledger,
            identity,
            config,
            shutdown,
        }
    }

    /// Cancel spawned confirmation watches when `shutdown` flips to `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// A watcher sharing this service's ledger and store.
    pub fn watcher(&self) -> ConfirmationWatcher {
        ConfirmationWatcher::new(
            self.ledger.clone(),
            self.store.clone(),
            self.config.ledger_timeout,
        )
    }

    /// Run the pipeline for `document_id`.
    pub async fn publish(&self, document_id: &DocumentId) -> Result<PublishOutcome, PublishError> {
        let mut run = PublishRun::new(document_id.clone());
        let span = tracing::info_span!(
            "publish",
            document_id = %document_id,
            run_id = %run.run_id
        );

        async {
            let _timer = HistogramTimer::new(&PUBLISH_DURATION);
            let result = self.drive(&mut run).await;
            match &result {
                Ok(PublishOutcome::Published(receipt)) => {
                    PUBLISH_OUTCOMES.with_label_values(&["published"]).inc();
                    info!(
                        tx_id = %receipt.tx_id,
                        status = receipt.status,
                        fee = %receipt.fee,
                        "[aw-05] Document published"
                    );
                    if self.config.watch_confirmations {
                        self.spawn_watch(document_id.clone(), receipt.tx_id.clone());
                    }
                }
                Ok(PublishOutcome::AlreadyPublished(record)) => {
                    PUBLISH_OUTCOMES.with_label_values(&["duplicate"]).inc();
                    info!(tx_id = %record.ledger_tx_id, "[aw-05] Already published");
                }
                Err(e) => {
                    run.fail(e.phase());
                    PUBLISH_OUTCOMES.with_label_values(&["failed"]).inc();
                    PUBLISH_FAILURES.with_label_values(&[e.phase().as_str()]).inc();
                    if e.is_reconciliation_gap() {
                        RECONCILIATION_GAPS.inc();
                        error!(
                            tx_id = ?e.tx_id().map(|t| t.as_str()),
                            error = %e,
                            "[aw-05] Reconciliation gap: ledger transaction has no index entry"
                        );
                    } else {
                        warn!(
                            phase = %e.phase(),
                            retryable = e.is_retryable(),
                            error = %e,
                            "[aw-05] Publish failed"
                        );
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, run: &mut PublishRun) -> Result<PublishOutcome, PublishError> {
        let document_id = run.document_id.clone();

        // NEW -> CHECKED
        let existing = self.read_record(&document_id).await?;
        run.transition_to(PublishState::Checked)?;
        if let Some(record) = existing {
            run.transition_to(PublishState::RejectedDuplicate)?;
            return Ok(PublishOutcome::AlreadyPublished(Box::new(record)));
        }

        // CHECKED -> FETCHED
        let document = match timeout(self.config.fetch_timeout, self.fetcher.fetch(&document_id))
            .await
        {
            Ok(result) => result.map_err(PublishError::FetchFailure)?,
            Err(_) => {
                return Err(PublishError::FetchFailure(FetchError::Timeout(elapsed(
                    self.config.fetch_timeout,
                ))))
            }
        };
        run.record_fetched(document.metadata.clone())?;
        let payload = document.content.payload();
        debug!(byte_size = payload.len(), "[aw-05] Content fetched");

        // FETCHED -> PRICED
        let byte_size = payload.len() as u64;
        let quote = self
            .ledger_call(self.ledger.quote_fee(byte_size))
            .await
            .map_err(PublishError::QuoteFailure)?;
        run.record_priced(quote)?;
        debug!(byte_size, fee = %quote.fee, "[aw-05] Fee quoted");

        // PRICED -> SIGNED
        let tags = DocumentTags::from_metadata(&document_id, &document.metadata)
            .with_content(&document.content.encoding, &document.content.content_type)
            .to_tags();
        let tx = self
            .ledger
            .build_and_sign(payload, tags, &quote, &self.identity)
            .map_err(PublishError::SigningFailure)?;
        run.record_signed(tx.id().clone())?;
        debug!(tx_id = %tx.id(), "[aw-05] Transaction signed");

        // SIGNED -> BROADCAST
        let receipt = self
            .ledger_call(self.ledger.broadcast(&tx))
            .await
            .map_err(PublishError::BroadcastFailure)?;
        match receipt.outcome() {
            BroadcastOutcome::Rejected => {
                return Err(PublishError::BroadcastRejected {
                    status: receipt.status,
                    tx_id: receipt.tx_id,
                })
            }
            BroadcastOutcome::AlreadyProcessed => {
                info!(tx_id = %receipt.tx_id, "[aw-05] Network already holds transaction")
            }
            BroadcastOutcome::Accepted => {}
        }
        run.record_broadcast(receipt.tx_id.clone(), receipt.status)?;

        // BROADCAST -> INDEXED
        let record = run.to_record().ok_or(PublishError::InvalidTransition {
            from: run.state(),
            to: PublishState::Indexed,
        })?;
        self.write_record(record).await?;
        run.transition_to(PublishState::Indexed)?;

        Ok(PublishOutcome::Published(PublishReceipt {
            document_id,
            tx_id: receipt.tx_id,
            status: receipt.status,
            fee: quote.fee,
            byte_size,
        }))
    }

    async fn read_record(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, PublishError> {
        match timeout(self.config.store_timeout, self.store.get(document_id)).await {
            Ok(result) => result.map_err(|e| PublishError::IndexReadFailure(e.to_string())),
            Err(_) => Err(PublishError::IndexReadFailure(elapsed(
                self.config.store_timeout,
            ))),
        }
    }

    /// The conditional insert is the duplicate guard. Losing it to a run that
    /// indexed the same transaction is a success; any other loss is a gap.
    async fn write_record(&self, record: DocumentRecord) -> Result<(), PublishError> {
        let tx_id = record.ledger_tx_id.clone();
        let outcome = match timeout(self.config.store_timeout, self.store.insert_if_absent(record))
            .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                return Err(PublishError::IndexWriteFailure {
                    tx_id,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(PublishError::IndexWriteFailure {
                    tx_id,
                    reason: elapsed(self.config.store_timeout),
                })
            }
        };

        match outcome {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::AlreadyExists(existing) if existing.ledger_tx_id == tx_id => {
                debug!(tx_id = %tx_id, "[aw-05] Concurrent run indexed the same transaction");
                Ok(())
            }
            InsertOutcome::AlreadyExists(existing) => Err(PublishError::IndexConflict {
                tx_id,
                existing_tx_id: existing.ledger_tx_id,
            }),
        }
    }

    async fn ledger_call<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, LedgerError>>,
    ) -> Result<T, LedgerError> {
        match timeout(self.config.ledger_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(elapsed(self.config.ledger_timeout))),
        }
    }

    fn spawn_watch(&self, document_id: DocumentId, tx_id: LedgerTxId) {
        let watcher = self.watcher();
        let policy = self.config.poll_policy.clone();
        let cancel = self.shutdown.clone();
        let span = tracing::info_span!("confirm", document_id = %document_id, tx_id = %tx_id);
        tokio::spawn(
            async move {
                if let Err(e) = watcher.watch(&document_id, &tx_id, &policy, cancel).await {
                    warn!(error = %e, "[aw-05] Confirmation watch ended without final status");
                }
            }
            .instrument(span),
        );
    }

    /// Whether a record exists for `document_id`.
    pub async fn check(&self, document_id: &DocumentId) -> Result<bool, PublishError> {
        Ok(self.read_record(document_id).await?.is_some())
    }

    /// Stored record for `document_id`.
    pub async fn get(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, PublishError> {
        self.read_record(document_id).await
    }

    /// Every stored record, ordered by document id.
    pub async fn list(&self) -> Result<Vec<DocumentRecord>, PublishError> {
        match timeout(self.config.store_timeout, self.store.list()).await {
            Ok(result) => result.map_err(|e| PublishError::IndexReadFailure(e.to_string())),
            Err(_) => Err(PublishError::IndexReadFailure(elapsed(
                self.config.store_timeout,
            ))),
        }
    }

    /// Poll once and persist the observed status when it changed.
    pub async fn refresh_status(
        &self,
        document_id: &DocumentId,
    ) -> Result<DocumentRecord, PublishError> {
        let record = self
            .read_record(document_id)
            .await?
            .ok_or_else(|| PublishError::NotIndexed(document_id.clone()))?;

        let status = self
            .ledger_call(self.ledger.poll_status(&record.ledger_tx_id))
            .await
            .map_err(PublishError::PollFailure)?;
        if !status.is_ledger_answer() {
            return Err(PublishError::PollFailure(LedgerError::HttpStatus {
                status: status.code,
                body: String::new(),
            }));
        }
        if status.code == record.ledger_status {
            return Ok(record);
        }

        info!(
            document_id = %document_id,
            tx_id = %record.ledger_tx_id,
            from = record.ledger_status,
            to = status.code,
            "[aw-05] Ledger status changed"
        );
        match timeout(
            self.config.store_timeout,
            self.store.update_status(document_id, status.code),
        )
        .await
        {
            Ok(result) => result.map_err(|e| PublishError::StatusUpdateFailure(e.to_string())),
            Err(_) => Err(PublishError::StatusUpdateFailure(elapsed(
                self.config.store_timeout,
            ))),
        }
    }

    /// Read back the transaction anchoring `document_id`.
    pub async fn transaction(
        &self,
        document_id: &DocumentId,
    ) -> Result<StoredTransaction, PublishError> {
        let record = self
            .read_record(document_id)
            .await?
            .ok_or_else(|| PublishError::NotIndexed(document_id.clone()))?;
        self.ledger_call(self.ledger.fetch_transaction(&record.ledger_tx_id))
            .await
            .map_err(PublishError::TransactionFetchFailure)
    }
}

fn elapsed(limit: Duration) -> String {
    format!("timed out after {} ms", limit.as_millis())
}

#[async_trait]
impl PublishApi for PublishService {
    async fn check(&self, document_id: &DocumentId) -> Result<bool, PublishError> {
        PublishService::check(self, document_id).await
    }

    async fn publish(&self, document_id: &DocumentId) -> Result<PublishOutcome, PublishError> {
        PublishService::publish(self, document_id).await
    }

    async fn get(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<DocumentRecord>, PublishError> {
        PublishService::get(self, document_id).await
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>, PublishError> {
        PublishService::list(self).await
    }

    async fn refresh_status(
        &self,
        document_id: &DocumentId,
    ) -> Result<DocumentRecord, PublishError> {
        PublishService::refresh_status(self, document_id).await
    }

    async fn transaction(
        &self,
        document_id: &DocumentId,
    ) -> Result<StoredTransaction, PublishError> {
        PublishService::transaction(self, document_id).await
    }
}
