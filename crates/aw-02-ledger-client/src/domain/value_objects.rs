//! # Value Objects
//!
//! Fees, broadcast receipts and status reads exchanged with the ledger.

use serde::{Deserialize, Serialize};
use shared_types::{LedgerStatus, LedgerTxId};
use std::fmt;
use std::str::FromStr;

use super::errors::LedgerError;
use super::tags::{DocumentTags, Tag};

// =============================================================================
// AMOUNTS
// =============================================================================

/// Amount in the ledger's smallest currency unit.
///
/// Serialized as a decimal string, the way the gateway reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Winston(pub u128);

impl Winston {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Winston {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Winston {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('"');
        trimmed
            .parse::<u128>()
            .map(Self)
            .map_err(|e| LedgerError::InvalidResponse(format!("bad amount '{trimmed}': {e}")))
    }
}

impl Serialize for Winston {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Winston {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A fee obtained from the network for a specific payload size.
///
/// The only way to obtain a fee. Signing refuses a quote whose `byte_size`
/// differs from the payload actually signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeQuote {
    /// Payload size the quote was issued for.
    pub byte_size: u64,
    /// Quoted fee.
    pub fee: Winston,
}

impl FeeQuote {
    /// Create a quote.
    pub fn new(byte_size: u64, fee: Winston) -> Self {
        Self { byte_size, fee }
    }

    /// Whether the quote was issued for a payload of this length.
    pub fn covers(&self, payload_len: usize) -> bool {
        self.byte_size == payload_len as u64
    }
}

// =============================================================================
// BROADCAST
// =============================================================================

/// How the network answered a broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// 200: accepted for inclusion.
    Accepted,
    /// 208: the network already holds this transaction.
    AlreadyProcessed,
    /// Anything else.
    Rejected,
}

/// Result of one broadcast call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastReceipt {
    /// HTTP status code returned by the network.
    pub status: u16,
    /// Transaction id echoed back.
    pub tx_id: LedgerTxId,
}

impl BroadcastReceipt {
    /// Classify the status code.
    pub fn outcome(&self) -> BroadcastOutcome {
        match self.status {
            200 => BroadcastOutcome::Accepted,
            208 => BroadcastOutcome::AlreadyProcessed,
            _ => BroadcastOutcome::Rejected,
        }
    }

    /// Accepted or already processed.
    pub fn is_accepted(&self) -> bool {
        self.outcome() != BroadcastOutcome::Rejected
    }

    /// Coarse ledger status implied by the broadcast.
    pub fn ledger_status(&self) -> LedgerStatus {
        LedgerStatus::from_broadcast_code(self.status)
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Confirmation details of an included transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Blocks built on top of the including block.
    pub number_of_confirmations: u64,
    /// Height of the including block.
    pub block_height: u64,
    /// Hash of the including block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_indep_hash: Option<String>,
}

/// One status read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxStatus {
    /// HTTP status code of the status endpoint.
    pub code: u16,
    /// Present when `code` is 200.
    pub confirmation: Option<Confirmation>,
}

impl TxStatus {
    /// Pending read (202).
    pub fn pending() -> Self {
        Self {
            code: 202,
            confirmation: None,
        }
    }

    /// Coarse status.
    pub fn status(&self) -> LedgerStatus {
        LedgerStatus::from_poll_code(self.code)
    }

    /// False when the gateway failed (5xx, 429) instead of answering about
    /// the transaction. Such codes are never persisted as ledger status.
    pub fn is_ledger_answer(&self) -> bool {
        !(self.code >= 500 || self.code == 429)
    }
}

// =============================================================================
// STORED TRANSACTIONS
// =============================================================================

/// A transaction as read back from the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredTransaction {
    /// Transaction id.
    pub id: LedgerTxId,
    /// Owner public key (base64url).
    pub owner: String,
    /// Decoded tags in stored order.
    pub tags: Vec<Tag>,
    /// Payload size in bytes.
    pub data_size: u64,
    /// Fee paid.
    pub reward: Winston,
    /// Where the payload can be downloaded.
    pub data_url: String,
}

impl StoredTransaction {
    /// Interpret the tags with the document schema.
    pub fn document_tags(&self) -> Result<DocumentTags, LedgerError> {
        DocumentTags::parse(&self.tags)
    }
}
