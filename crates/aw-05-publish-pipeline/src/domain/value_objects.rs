//! # Value Objects
//!
//! Publish states, run outcomes and the confirmation polling policy.

use aw_02_ledger_client::{TxStatus, Winston};
use shared_types::{DocumentId, DocumentRecord, LedgerTxId};
use std::fmt;
use std::time::Duration;

// =============================================================================
// PUBLISH STATE
// =============================================================================

/// Progress of one document through the pipeline.
///
/// ```text
/// NEW -> CHECKED -> FETCHED -> PRICED -> SIGNED -> BROADCAST -> INDEXED
///           |
///           +-> REJECTED_DUPLICATE
///
/// any non-terminal state -> FAILED
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PublishState {
    /// Bare document id, nothing read yet.
    #[default]
    New,
    /// Index read, no record exists.
    Checked,
    /// Metadata and content retrieved.
    Fetched,
    /// Fee quoted for the exact payload size.
    Priced,
    /// Transaction built and signed; id frozen.
    Signed,
    /// Network accepted the transaction.
    Broadcast,
    /// Record persisted (terminal success).
    Indexed,
    /// A record already existed (terminal, no side effects).
    RejectedDuplicate,
    /// A step failed (terminal).
    Failed,
}

impl PublishState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: PublishState) -> bool {
        match (self, next) {
            (Self::New, Self::Checked) => true,
            (Self::Checked, Self::Fetched) => true,
            (Self::Checked, Self::RejectedDuplicate) => true,
            (Self::Fetched, Self::Priced) => true,
            (Self::Priced, Self::Signed) => true,
            (Self::Signed, Self::Broadcast) => true,
            (Self::Broadcast, Self::Indexed) => true,
            (current, Self::Failed) => !current.is_terminal(),
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Indexed | Self::RejectedDuplicate | Self::Failed)
    }

    /// Upper-case state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Checked => "CHECKED",
            Self::Fetched => "FETCHED",
            Self::Priced => "PRICED",
            Self::Signed => "SIGNED",
            Self::Broadcast => "BROADCAST",
            Self::Indexed => "INDEXED",
            Self::RejectedDuplicate => "REJECTED_DUPLICATE",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// What a successful publish returns to the caller: broadcast acceptance,
/// not confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Published document.
    pub document_id: DocumentId,
    /// Transaction anchoring the document.
    pub tx_id: LedgerTxId,
    /// Broadcast status code (200 or 208).
    pub status: u16,
    /// Fee paid.
    pub fee: Winston,
    /// Payload size the fee was quoted for.
    pub byte_size: u64,
}

impl PublishReceipt {
    /// Human-readable acknowledgement.
    pub fn message(&self) -> String {
        format!(
            "Data is uploading to arweave with this broadcast ID {} and Arweave status {}.",
            self.tx_id, self.status
        )
    }
}

/// Result of `publish`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Broadcast accepted and record indexed.
    Published(PublishReceipt),
    /// A record existed before this run; nothing was done.
    AlreadyPublished(Box<DocumentRecord>),
}

impl PublishOutcome {
    /// Terminal state the run ended in.
    pub fn state(&self) -> PublishState {
        match self {
            Self::Published(_) => PublishState::Indexed,
            Self::AlreadyPublished(_) => PublishState::RejectedDuplicate,
        }
    }
}

// =============================================================================
// CONFIRMATION POLLING
// =============================================================================

/// Bounded exponential backoff for confirmation polling.
#[derive(Clone, Debug, PartialEq)]
pub struct PollPolicy {
    /// Maximum number of status reads.
    pub max_attempts: u32,
    /// Delay after the first read.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor between delays.
    pub multiplier: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(120),
            multiplier: 2.0,
        }
    }
}

impl PollPolicy {
    /// Delay to wait after read number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !delay.is_finite() || delay >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(delay.max(0.0))
    }

    /// Reject policies that never poll or never stop growing sensibly.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(format!("multiplier must be >= 1.0, got {}", self.multiplier));
        }
        if self.initial_delay > self.max_delay {
            return Err("initial_delay exceeds max_delay".into());
        }
        Ok(())
    }
}

/// How a confirmation watch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The network reports the transaction as part of its permanent record.
    Confirmed(TxStatus),
    /// The network refused the transaction.
    Rejected {
        /// Status code observed
        code: u16,
    },
    /// The caller stopped the watch.
    Cancelled {
        /// Polls performed before cancellation
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            PublishState::New,
            PublishState::Checked,
            PublishState::Fetched,
            PublishState::Priced,
            PublishState::Signed,
            PublishState::Broadcast,
            PublishState::Indexed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_duplicate_only_from_checked() {
        assert!(PublishState::Checked.can_transition_to(PublishState::RejectedDuplicate));
        assert!(!PublishState::New.can_transition_to(PublishState::RejectedDuplicate));
        assert!(!PublishState::Broadcast.can_transition_to(PublishState::RejectedDuplicate));
    }

    #[test]
    fn test_no_skipping_steps() {
        assert!(!PublishState::Checked.can_transition_to(PublishState::Signed));
        assert!(!PublishState::Fetched.can_transition_to(PublishState::Broadcast));
        assert!(!PublishState::Priced.can_transition_to(PublishState::Indexed));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [
            PublishState::Indexed,
            PublishState::RejectedDuplicate,
            PublishState::Failed,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(PublishState::Failed));
            assert!(!terminal.can_transition_to(PublishState::Checked));
        }
        assert!(PublishState::Signed.can_transition_to(PublishState::Failed));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = PollPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        };
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(8));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(10));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_policy_validation() {
        assert!(PollPolicy::default().validate().is_ok());
        let zero = PollPolicy {
            max_attempts: 0,
            ..PollPolicy::default()
        };
        assert!(zero.validate().is_err());
        let shrinking = PollPolicy {
            multiplier: 0.5,
            ..PollPolicy::default()
        };
        assert!(shrinking.validate().is_err());
    }

    #[test]
    fn test_receipt_message() {
        let receipt = PublishReceipt {
            document_id: DocumentId::parse("2101.00001").unwrap(),
            tx_id: LedgerTxId("abc123".into()),
            status: 200,
            fee: Winston(500000),
            byte_size: 12,
        };
        assert_eq!(
            receipt.message(),
            "Data is uploading to arweave with this broadcast ID abc123 and Arweave status 200."
        );
    }
}
