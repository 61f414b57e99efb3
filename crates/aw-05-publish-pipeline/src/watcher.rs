//! # Confirmation Watcher
//!
//! Bounded, cancellable polling of a broadcast transaction.
//!
//! Each iteration performs one `poll_status` read. A newly observed status
//! code is written to the index with `update_status`; a final status ends the
//! watch. Between iterations the watcher sleeps for the policy's backoff
//! delay and wakes early when the cancel flag flips to `true`. Cancelling
//! only stops observation: the ledger transaction is unaffected.

use arxweave_telemetry::CONFIRMATION_WATCHES;
use shared_types::{DocumentId, LedgerStatus, LedgerTxId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{PollPolicy, PublishError, WatchOutcome};
use crate::ports::{IndexStore, LedgerClient};

/// Polls the ledger until a transaction reaches a final status.
pub struct ConfirmationWatcher {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn IndexStore>,
    call_timeout: Duration,
}

impl ConfirmationWatcher {
    /// Create a watcher. `call_timeout` bounds each status read and each
    /// index update.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn IndexStore>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            store,
            call_timeout,
        }
    }

    /// Watch `tx_id`, which anchors `document_id`.
    ///
    /// Returns `PublishError::PollTimeout` once `policy.max_attempts` reads
    /// passed without a final status. Failed reads count as attempts.
    pub async fn watch(
        &self,
        document_id: &DocumentId,
        tx_id: &LedgerTxId,
        policy: &PollPolicy,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<WatchOutcome, PublishError> {
        let mut last_code: Option<u16> = None;

        for attempt in 1..=policy.max_attempts {
            if *cancel.borrow() {
                return Ok(self.cancelled(tx_id, attempt - 1));
            }

            match tokio::time::timeout(self.call_timeout, self.ledger.poll_status(tx_id)).await {
                Ok(Ok(status)) if !status.is_ledger_answer() => {
                    warn!(tx_id = %tx_id, attempt, code = status.code, "[aw-05] Gateway failed status read");
                }
                Ok(Ok(status)) => {
                    if last_code != Some(status.code) {
                        self.persist_status(document_id, status.code).await;
                        last_code = Some(status.code);
                    }
                    match status.status() {
                        LedgerStatus::Confirmed => {
                            info!(
                                tx_id = %tx_id,
                                attempt,
                                "[aw-05] Transaction confirmed"
                            );
                            CONFIRMATION_WATCHES.with_label_values(&["confirmed"]).inc();
                            return Ok(WatchOutcome::Confirmed(status));
                        }
                        LedgerStatus::Rejected => {
                            warn!(
                                tx_id = %tx_id,
                                code = status.code,
                                "[aw-05] Transaction rejected by network"
                            );
                            CONFIRMATION_WATCHES.with_label_values(&["rejected"]).inc();
                            return Ok(WatchOutcome::Rejected { code: status.code });
                        }
                        _ => debug!(tx_id = %tx_id, attempt, code = status.code, "[aw-05] Not final yet"),
                    }
                }
                Ok(Err(e)) => warn!(tx_id = %tx_id, attempt, error = %e, "[aw-05] Status poll failed"),
                Err(_) => warn!(tx_id = %tx_id, attempt, "[aw-05] Status poll timed out"),
            }

            if attempt == policy.max_attempts {
                break;
            }
            if self
                .sleep_or_cancel(policy.delay_for_attempt(attempt), &mut cancel)
                .await
            {
                return Ok(self.cancelled(tx_id, attempt));
            }
        }

        CONFIRMATION_WATCHES.with_label_values(&["timeout"]).inc();
        Err(PublishError::PollTimeout {
            tx_id: tx_id.clone(),
            attempts: policy.max_attempts,
        })
    }

    async fn persist_status(&self, document_id: &DocumentId, code: u16) {
        match tokio::time::timeout(
            self.call_timeout,
            self.store.update_status(document_id, code),
        )
        .await
        {
            Ok(Ok(_)) => debug!(document_id = %document_id, code, "[aw-05] Ledger status stored"),
            Ok(Err(e)) => warn!(document_id = %document_id, error = %e, "[aw-05] Status update failed"),
            Err(_) => warn!(document_id = %document_id, "[aw-05] Status update timed out"),
        }
    }

    /// Sleep for `delay`. Returns `true` when cancelled first.
    async fn sleep_or_cancel(&self, delay: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = cancel.changed() => match changed {
                    Ok(()) if *cancel.borrow() => return true,
                    Ok(()) => continue,
                    // Nobody can cancel any more
                    Err(_) => {
                        (&mut sleep).await;
                        return false;
                    }
                },
            }
        }
    }

    fn cancelled(&self, tx_id: &LedgerTxId, attempts: u32) -> WatchOutcome {
        info!(tx_id = %tx_id, attempts, "[aw-05] Confirmation watch cancelled");
        CONFIRMATION_WATCHES.with_label_values(&["cancelled"]).inc();
        WatchOutcome::Cancelled { attempts }
    }
}
