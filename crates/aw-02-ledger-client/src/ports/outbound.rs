//! # Outbound Ports
//!
//! The ledger as seen by the publish pipeline.

use async_trait::async_trait;
use aw_01_signing_identity::SigningIdentity;
use parking_lot::Mutex;
use shared_types::LedgerTxId;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::algorithms;
use crate::domain::{
    BroadcastReceipt, Confirmation, FeeQuote, LedgerError, SignedTransaction, StoredTransaction,
    Tag, TxStatus, Winston,
};

/// Ledger client - outbound port.
///
/// Pure request/response: no state is carried between calls and nothing is
/// retried internally.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Quote the fee for a payload of `byte_size` bytes.
    async fn quote_fee(&self, byte_size: u64) -> Result<FeeQuote, LedgerError>;

    /// Build and sign a transaction. Once signed its id and content are frozen.
    fn build_and_sign(
        &self,
        payload: Vec<u8>,
        tags: Vec<Tag>,
        quote: &FeeQuote,
        identity: &SigningIdentity,
    ) -> Result<SignedTransaction, LedgerError> {
        algorithms::build_and_sign(payload, tags, quote, identity)
    }

    /// Submit a signed transaction exactly once.
    ///
    /// Any HTTP answer is returned as a receipt; only transport failures are
    /// errors. Callers must not re-broadcast an id already seen as accepted.
    async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastReceipt, LedgerError>;

    /// Single status read. Never loops.
    async fn poll_status(&self, tx_id: &LedgerTxId) -> Result<TxStatus, LedgerError>;

    /// Read a stored transaction back with decoded tags.
    async fn fetch_transaction(&self, tx_id: &LedgerTxId)
        -> Result<StoredTransaction, LedgerError>;

    /// Wallet balance of `address`.
    async fn balance(&self, address: &str) -> Result<Winston, LedgerError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// In-process ledger for tests.
///
/// Counts side effects so tests can assert that a broadcast happened exactly
/// once, or that the fee was quoted for the exact payload size.
pub struct MockLedgerClient {
    fee_per_byte: u128,
    broadcast_status: u16,
    echo_tx_id: Option<String>,
    should_fail_quote: bool,
    should_fail_broadcast: bool,
    should_fail_poll: bool,
    delay: Option<Duration>,
    wallet_balance: Winston,
    poll_codes: Mutex<VecDeque<u16>>,
    quoted_sizes: Mutex<Vec<u64>>,
    broadcasts: Mutex<Vec<SignedTransaction>>,
    polls: AtomicUsize,
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self {
            fee_per_byte: 10,
            broadcast_status: 200,
            echo_tx_id: None,
            should_fail_quote: false,
            should_fail_broadcast: false,
            should_fail_poll: false,
            delay: None,
            wallet_balance: Winston(1_000_000_000_000),
            poll_codes: Mutex::new(VecDeque::new()),
            quoted_sizes: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }
}

impl MockLedgerClient {
    /// Mock with default behavior: every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fee charged per quoted byte.
    pub fn with_fee_per_byte(mut self, fee: u128) -> Self {
        self.fee_per_byte = fee;
        self
    }

    /// Status code every broadcast answers with.
    pub fn with_broadcast_status(mut self, status: u16) -> Self {
        self.broadcast_status = status;
        self
    }

    /// Echo `id` from broadcast instead of the signed transaction id.
    pub fn with_echo_tx_id(mut self, id: impl Into<String>) -> Self {
        self.echo_tx_id = Some(id.into());
        self
    }

    /// Fail quotes with a network error.
    pub fn failing_quote(mut self) -> Self {
        self.should_fail_quote = true;
        self
    }

    /// Fail broadcasts with a network error.
    pub fn failing_broadcast(mut self) -> Self {
        self.should_fail_broadcast = true;
        self
    }

    /// Fail status reads with a network error.
    pub fn failing_poll(mut self) -> Self {
        self.should_fail_poll = true;
        self
    }

    /// Delay every network call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Balance reported for every address.
    pub fn with_balance(mut self, balance: Winston) -> Self {
        self.wallet_balance = balance;
        self
    }

    /// Queue status codes returned by successive polls (then 202 forever).
    pub fn with_poll_codes(self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.poll_codes.lock().extend(codes);
        self
    }

    /// Sizes passed to `quote_fee`, in call order.
    pub fn quoted_sizes(&self) -> Vec<u64> {
        self.quoted_sizes.lock().clone()
    }

    /// Number of broadcast calls.
    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().len()
    }

    /// Transactions passed to `broadcast`, in call order.
    pub fn broadcasts(&self) -> Vec<SignedTransaction> {
        self.broadcasts.lock().clone()
    }

    /// Number of status reads.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn quote_fee(&self, byte_size: u64) -> Result<FeeQuote, LedgerError> {
        self.pause().await;
        if self.should_fail_quote {
            return Err(LedgerError::Network("Mock failure".to_string()));
        }
        self.quoted_sizes.lock().push(byte_size);
        Ok(FeeQuote::new(
            byte_size,
            Winston(byte_size as u128 * self.fee_per_byte),
        ))
    }

    async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastReceipt, LedgerError> {
        self.pause().await;
        if self.should_fail_broadcast {
            return Err(LedgerError::Network("Mock failure".to_string()));
        }
        self.broadcasts.lock().push(tx.clone());
        let tx_id = match &self.echo_tx_id {
            Some(id) => LedgerTxId(id.clone()),
            None => tx.id().clone(),
        };
        Ok(BroadcastReceipt {
            status: self.broadcast_status,
            tx_id,
        })
    }

    async fn poll_status(&self, _tx_id: &LedgerTxId) -> Result<TxStatus, LedgerError> {
        self.pause().await;
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail_poll {
            return Err(LedgerError::Network("Mock failure".to_string()));
        }
        let code = self.poll_codes.lock().pop_front().unwrap_or(202);
        let confirmation = (code == 200).then(|| Confirmation {
            number_of_confirmations: 1,
            block_height: 1,
            block_indep_hash: None,
        });
        Ok(TxStatus { code, confirmation })
    }

    async fn fetch_transaction(
        &self,
        tx_id: &LedgerTxId,
    ) -> Result<StoredTransaction, LedgerError> {
        self.pause().await;
        let broadcasts = self.broadcasts.lock();
        let tx = broadcasts
            .iter()
            .find(|tx| tx.id() == tx_id || self.echo_tx_id.as_deref() == Some(tx_id.as_str()))
            .ok_or_else(|| LedgerError::NotFound(tx_id.to_string()))?;
        Ok(StoredTransaction {
            id: tx_id.clone(),
            owner: tx.owner().to_string(),
            tags: tx.tags().to_vec(),
            data_size: tx.data_size(),
            reward: tx.reward(),
            data_url: format!("mock://{tx_id}"),
        })
    }

    async fn balance(&self, _address: &str) -> Result<Winston, LedgerError> {
        self.pause().await;
        Ok(self.wallet_balance)
    }
}
