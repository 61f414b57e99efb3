//! # Entities
//!
//! `PublishRun`: one document's walk through the state machine, accumulating
//! the Document Record as it goes.

use aw_02_ledger_client::FeeQuote;
use shared_types::{DocumentId, DocumentMetadata, DocumentRecord, LedgerTxId};
use uuid::Uuid;

use super::{PublishError, PublishPhase, PublishState};

/// A single publish attempt.
#[derive(Clone, Debug)]
pub struct PublishRun {
    /// Correlation id for logs.
    pub run_id: Uuid,
    /// Document being published.
    pub document_id: DocumentId,
    state: PublishState,
    metadata: Option<DocumentMetadata>,
    quote: Option<FeeQuote>,
    signed_tx_id: Option<LedgerTxId>,
    tx_id: Option<LedgerTxId>,
    ledger_status: Option<u16>,
    failed_phase: Option<PublishPhase>,
}

impl PublishRun {
    /// Start a run in `NEW`.
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            document_id,
            state: PublishState::New,
            metadata: None,
            quote: None,
            signed_tx_id: None,
            tx_id: None,
            ledger_status: None,
            failed_phase: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Fetched metadata, once `FETCHED`.
    pub fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    /// Fee quote, once `PRICED`.
    pub fn quote(&self) -> Option<&FeeQuote> {
        self.quote.as_ref()
    }

    /// Id derived from the signed content, once `SIGNED`.
    pub fn signed_tx_id(&self) -> Option<&LedgerTxId> {
        self.signed_tx_id.as_ref()
    }

    /// Id echoed by the network, once `BROADCAST`. Immutable afterwards.
    pub fn tx_id(&self) -> Option<&LedgerTxId> {
        self.tx_id.as_ref()
    }

    /// Status observed at broadcast.
    pub fn ledger_status(&self) -> Option<u16> {
        self.ledger_status
    }

    /// Phase that failed, once `FAILED`.
    pub fn failed_phase(&self) -> Option<PublishPhase> {
        self.failed_phase
    }

    /// Transition to new state.
    pub fn transition_to(&mut self, new_state: PublishState) -> Result<(), PublishError> {
        if !self.state.can_transition_to(new_state) {
            return Err(PublishError::InvalidTransition {
                from: self.state,
                to: new_state,
            });
        }
        self.state = new_state;
        Ok(())
    }

    /// `CHECKED -> FETCHED`.
    pub fn record_fetched(&mut self, metadata: DocumentMetadata) -> Result<(), PublishError> {
        self.transition_to(PublishState::Fetched)?;
        self.metadata = Some(metadata);
        Ok(())
    }

    /// `FETCHED -> PRICED`.
    pub fn record_priced(&mut self, quote: FeeQuote) -> Result<(), PublishError> {
        self.transition_to(PublishState::Priced)?;
        self.quote = Some(quote);
        Ok(())
    }

    /// `PRICED -> SIGNED`.
    pub fn record_signed(&mut self, tx_id: LedgerTxId) -> Result<(), PublishError> {
        self.transition_to(PublishState::Signed)?;
        self.signed_tx_id = Some(tx_id);
        Ok(())
    }

    /// `SIGNED -> BROADCAST`. `tx_id` is the id the network echoed.
    pub fn record_broadcast(&mut self, tx_id: LedgerTxId, status: u16) -> Result<(), PublishError> {
        self.transition_to(PublishState::Broadcast)?;
        self.tx_id = Some(tx_id);
        self.ledger_status = Some(status);
        Ok(())
    }

    /// Move to `FAILED`, remembering the phase. No-op when already terminal.
    pub fn fail(&mut self, phase: PublishPhase) {
        if self.state.can_transition_to(PublishState::Failed) {
            self.state = PublishState::Failed;
            self.failed_phase = Some(phase);
        }
    }

    /// The record to persist. Only available in `BROADCAST`, when every
    /// field is known.
    pub fn to_record(&self) -> Option<DocumentRecord> {
        if self.state != PublishState::Broadcast {
            return None;
        }
        Some(DocumentRecord::new(
            self.document_id.clone(),
            self.metadata.clone()?,
            self.tx_id.clone()?,
            self.ledger_status?,
        ))
    }
}
