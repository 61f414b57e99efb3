//! # Response Bodies
//!
//! JSON shapes returned by the gateway. Field names follow the public API
//! (`arXivID`, `txId`, `txStatus`) rather than Rust conventions.

use serde::{Deserialize, Serialize};

/// `status` value of a successful publish.
pub const STATUS_SUCCESS: &str = "Success";
/// `status` value of an informational refusal (duplicate, unknown id).
pub const STATUS_BAD_REQUEST: &str = "Bad Request";
/// `status` value of a failed request.
pub const STATUS_ERROR: &str = "Error";

/// Message returned when the document already has a record.
pub const MSG_ALREADY_UPLOADED: &str = "This arXiv entry is already uploaded.";
/// Message returned when no record exists for the document.
pub const MSG_NOT_IN_INDEX: &str = "This arXiv entry does not exist in Arxweave.";
/// Message returned to requests arriving without `Origin` from an unknown referer.
pub const MSG_LOCAL_VISIT: &str = "Hi you are visiting the service locally. If this was a CORS the origin header should not be undefined";

/// `GET /exists/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    /// Queried document id
    #[serde(rename = "arXivID")]
    pub arxiv_id: String,
    /// Whether a record exists
    pub exists: bool,
}

/// Body of `POST /new`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishRequest {
    /// Document to publish
    #[serde(rename = "arXivID")]
    pub arxiv_id: String,
}

/// Successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    /// Always [`STATUS_SUCCESS`]
    pub status: String,
    /// Human-readable acknowledgement
    pub msg: String,
    /// Broadcast transaction id
    pub tx_id: String,
    /// Broadcast status code
    pub tx_status: u16,
}

/// Informational `{status, msg}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Status label
    pub status: String,
    /// Message
    pub msg: String,
}

impl MessageResponse {
    /// `Bad Request` body with `msg`.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST.to_string(),
            msg: msg.into(),
        }
    }
}

/// Failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always [`STATUS_ERROR`]
    pub status: String,
    /// Pipeline phase that failed, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Whether the caller may repeat the request
    pub retryable: bool,
    /// Error description
    pub msg: String,
    /// Transaction left on the ledger without an index entry
    #[serde(rename = "txId", skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

/// `GET /tx/:id`, the ledger transaction behind a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Indexed document
    #[serde(rename = "arXivID")]
    pub arxiv_id: String,
    /// Transaction id the record references
    pub tx_id: String,
    /// Owner public key (base64url)
    pub owner: String,
    /// Payload size in bytes
    pub data_size: u64,
    /// Fee paid, in winston
    pub reward: String,
    /// Payload download location
    pub data_url: String,
    /// Decoded tags in stored order
    pub tags: Vec<TagResponse>,
}

/// Decoded transaction tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    /// Tag name
    pub name: String,
    /// Tag value
    pub value: String,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`
    pub status: String,
    /// Crate version
    pub version: String,
}
