//! HTTP ledger gateway client.
//!
//! | Operation | Request | Interpretation |
//! |-----------|---------|----------------|
//! | quote | `GET /price/{bytes}` | decimal fee |
//! | broadcast | `POST /tx` | status code returned as-is |
//! | poll | `GET /tx/{id}/status` | 200 confirmed, 202 pending, 404 unknown |
//! | fetch | `GET /tx/{id}` | envelope without data |
//! | balance | `GET /wallet/{address}/balance` | decimal amount |

use arxweave_telemetry::{BROADCAST_RESPONSES, LEDGER_CALL_DURATION};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared_types::LedgerTxId;
use tracing::{debug, info, warn};

use crate::domain::{
    errors::truncate_body, BroadcastReceipt, Confirmation, FeeQuote, LedgerConfig, LedgerError,
    SignedTransaction, StoredTransaction, TransactionEnvelope, TxStatus, Winston,
};
use crate::ports::LedgerClient;

/// Ledger client speaking to an HTTP gateway.
pub struct HttpLedgerClient {
    client: Client,
    config: LedgerConfig,
}

impl HttpLedgerClient {
    /// Create a client. Every request carries `config.request_timeout`.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    async fn get_text(&self, path: &str) -> Result<String, LedgerError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(map_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest)?;
        if !status.is_success() {
            return Err(LedgerError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(body)
    }
}

fn map_reqwest(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Timeout(e.to_string())
    } else {
        LedgerError::Network(e.to_string())
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn quote_fee(&self, byte_size: u64) -> Result<FeeQuote, LedgerError> {
        let _timer = LEDGER_CALL_DURATION
            .with_label_values(&["quote"])
            .start_timer();
        let body = self.get_text(&format!("/price/{byte_size}")).await?;
        let fee: Winston = body.parse()?;
        debug!(byte_size, fee = %fee, "[aw-02] Fee quoted");
        Ok(FeeQuote::new(byte_size, fee))
    }

    async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastReceipt, LedgerError> {
        let _timer = LEDGER_CALL_DURATION
            .with_label_values(&["broadcast"])
            .start_timer();
        let response = self
            .client
            .post(self.url("/tx"))
            .json(&tx.to_envelope())
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status().as_u16();
        BROADCAST_RESPONSES
            .with_label_values(&[&status.to_string()])
            .inc();

        let receipt = BroadcastReceipt {
            status,
            tx_id: tx.id().clone(),
        };
        if receipt.is_accepted() {
            info!(tx_id = %tx.id(), status, "[aw-02] Transaction broadcast");
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(
                tx_id = %tx.id(),
                status,
                body = %truncate_body(&body),
                "[aw-02] Broadcast refused by network"
            );
        }
        Ok(receipt)
    }

    async fn poll_status(&self, tx_id: &LedgerTxId) -> Result<TxStatus, LedgerError> {
        let _timer = LEDGER_CALL_DURATION
            .with_label_values(&["poll"])
            .start_timer();
        let response = self
            .client
            .get(self.url(&format!("/tx/{tx_id}/status")))
            .send()
            .await
            .map_err(map_reqwest)?;

        let code = response.status().as_u16();
        if response.status().is_server_error()
            || response.status() == StatusCode::TOO_MANY_REQUESTS
        {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::HttpStatus {
                status: code,
                body: truncate_body(&body),
            });
        }
        let confirmation = if response.status() == StatusCode::OK {
            let confirmation: Confirmation = response
                .json()
                .await
                .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
            Some(confirmation)
        } else {
            None
        };
        debug!(tx_id = %tx_id, code, "[aw-02] Status read");
        Ok(TxStatus { code, confirmation })
    }

    async fn fetch_transaction(
        &self,
        tx_id: &LedgerTxId,
    ) -> Result<StoredTransaction, LedgerError> {
        let _timer = LEDGER_CALL_DURATION
            .with_label_values(&["fetch"])
            .start_timer();
        let body = match self.get_text(&format!("/tx/{tx_id}")).await {
            Err(LedgerError::HttpStatus { status: 404, .. }) => {
                return Err(LedgerError::NotFound(tx_id.to_string()))
            }
            other => other?,
        };
        let envelope: TransactionEnvelope = serde_json::from_str(&body)
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        let data_size = envelope
            .data_size
            .parse()
            .map_err(|e| LedgerError::InvalidResponse(format!("data_size: {e}")))?;

        Ok(StoredTransaction {
            id: tx_id.clone(),
            owner: envelope.owner.clone(),
            tags: envelope.decoded_tags()?,
            data_size,
            reward: envelope.reward.parse()?,
            data_url: self.url(&format!("/{tx_id}")),
        })
    }

    async fn balance(&self, address: &str) -> Result<Winston, LedgerError> {
        let _timer = LEDGER_CALL_DURATION
            .with_label_values(&["balance"])
            .start_timer();
        self.get_text(&format!("/wallet/{address}/balance"))
            .await?
            .parse()
    }
}
