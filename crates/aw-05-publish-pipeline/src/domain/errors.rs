//! # Domain Errors
//!
//! Failure taxonomy of a publish run. Every variant names the phase that
//! failed; only the two post-broadcast index failures leave state behind.

use aw_02_ledger_client::LedgerError;
use aw_04_metadata_fetcher::FetchError;
use shared_types::{DocumentId, LedgerTxId};
use std::fmt;
use thiserror::Error;

use super::PublishState;

/// Step of the pipeline an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublishPhase {
    /// Existence check and other index reads.
    Check,
    /// Metadata and content retrieval.
    Fetch,
    /// Fee quote.
    Quote,
    /// Transaction construction and signing.
    Sign,
    /// Submission to the network.
    Broadcast,
    /// Index write after broadcast.
    Index,
    /// Status polling.
    Confirm,
}

impl PublishPhase {
    /// Lowercase label used in responses and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Fetch => "fetch",
            Self::Quote => "quote",
            Self::Sign => "sign",
            Self::Broadcast => "broadcast",
            Self::Index => "index",
            Self::Confirm => "confirm",
        }
    }
}

impl fmt::Display for PublishPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish pipeline error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The index store could not be read.
    #[error("Index read failed: {0}")]
    IndexReadFailure(String),

    /// Metadata or content could not be retrieved.
    #[error("Fetch failed: {0}")]
    FetchFailure(FetchError),

    /// The network did not quote a fee.
    #[error("Fee quote failed: {0}")]
    QuoteFailure(LedgerError),

    /// The transaction could not be built or signed.
    #[error("Signing failed: {0}")]
    SigningFailure(LedgerError),

    /// The broadcast call did not complete.
    #[error("Broadcast failed: {0}")]
    BroadcastFailure(LedgerError),

    /// The network answered the broadcast with a rejection status.
    #[error("Broadcast of {tx_id} rejected with status {status}")]
    BroadcastRejected {
        /// HTTP status returned by the network
        status: u16,
        /// Id of the refused transaction
        tx_id: LedgerTxId,
    },

    /// The index write failed after the network accepted the transaction.
    #[error("Index write failed after broadcast of {tx_id}: {reason}")]
    IndexWriteFailure {
        /// Transaction on the ledger without an index entry
        tx_id: LedgerTxId,
        /// Store error
        reason: String,
    },

    /// A concurrent run indexed a different transaction for the same id.
    #[error("Index already references {existing_tx_id}; broadcast {tx_id} is orphaned")]
    IndexConflict {
        /// Transaction this run broadcast
        tx_id: LedgerTxId,
        /// Transaction the index references
        existing_tx_id: LedgerTxId,
    },

    /// Confirmation polling exhausted its attempts.
    #[error("No final status for {tx_id} after {attempts} polls")]
    PollTimeout {
        /// Watched transaction
        tx_id: LedgerTxId,
        /// Polls performed
        attempts: u32,
    },

    /// A single status read failed.
    #[error("Status poll failed: {0}")]
    PollFailure(LedgerError),

    /// The ledger could not return the indexed transaction.
    #[error("Transaction lookup failed: {0}")]
    TransactionFetchFailure(LedgerError),

    /// A refreshed ledger status could not be stored.
    #[error("Status update failed: {0}")]
    StatusUpdateFailure(String),

    /// Status refresh requested for a document that was never indexed.
    #[error("Document not indexed: {0}")]
    NotIndexed(DocumentId),

    /// The state machine refused a transition.
    #[error("Invalid publish transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state
        from: PublishState,
        /// Attempted state
        to: PublishState,
    },
}

impl PublishError {
    /// Phase the error belongs to.
    pub fn phase(&self) -> PublishPhase {
        match self {
            Self::IndexReadFailure(_) | Self::NotIndexed(_) => PublishPhase::Check,
            Self::FetchFailure(_) => PublishPhase::Fetch,
            Self::QuoteFailure(_) => PublishPhase::Quote,
            Self::SigningFailure(_) | Self::InvalidTransition { .. } => PublishPhase::Sign,
            Self::BroadcastFailure(_) | Self::BroadcastRejected { .. } => PublishPhase::Broadcast,
            Self::IndexWriteFailure { .. } | Self::IndexConflict { .. } => PublishPhase::Index,
            Self::PollTimeout { .. }
            | Self::PollFailure(_)
            | Self::TransactionFetchFailure(_)
            | Self::StatusUpdateFailure(_) => PublishPhase::Confirm,
        }
    }

    /// Whether the caller may safely rerun the whole pipeline.
    ///
    /// True for every failure that leaves no index entry behind. A rerun
    /// after a lost broadcast answer signs the same content again, gets the
    /// same transaction id and is answered 208 by the network.
    pub fn is_retryable(&self) -> bool {
        !self.is_reconciliation_gap()
            && !matches!(
                self,
                Self::NotIndexed(_) | Self::InvalidTransition { .. }
            )
            && !matches!(self, Self::FetchFailure(FetchError::NotFound(_)))
    }

    /// The ledger holds a transaction the index does not reference.
    pub fn is_reconciliation_gap(&self) -> bool {
        matches!(
            self,
            Self::IndexWriteFailure { .. } | Self::IndexConflict { .. }
        )
    }

    /// Orphaned or watched transaction, when one exists.
    pub fn tx_id(&self) -> Option<&LedgerTxId> {
        match self {
            Self::BroadcastRejected { tx_id, .. }
            | Self::IndexWriteFailure { tx_id, .. }
            | Self::IndexConflict { tx_id, .. }
            | Self::PollTimeout { tx_id, .. } => Some(tx_id),
            _ => None,
        }
    }

    /// The document is unknown to the archive or to the index.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotIndexed(_)
                | Self::FetchFailure(FetchError::NotFound(_))
                | Self::TransactionFetchFailure(LedgerError::NotFound(_))
        )
    }

    /// Whether an external call ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::FetchFailure(FetchError::Timeout(_)) => true,
            Self::QuoteFailure(e)
            | Self::SigningFailure(e)
            | Self::BroadcastFailure(e)
            | Self::PollFailure(e)
            | Self::TransactionFetchFailure(e) => matches!(e, LedgerError::Timeout(_)),
            Self::PollTimeout { .. } => true,
            _ => false,
        }
    }
}
