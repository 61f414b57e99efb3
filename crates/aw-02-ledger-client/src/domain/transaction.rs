//! # Ledger Transaction
//!
//! A signed transaction is immutable: every field is private and the only
//! constructor lives in the signing algorithm. The wire envelope encodes
//! binary members as base64url.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use shared_types::LedgerTxId;

use super::errors::LedgerError;
use super::tags::Tag;
use super::value_objects::Winston;

/// Transaction format version.
pub const TX_FORMAT: u8 = 2;

/// A transaction whose id and content are frozen by its signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub(crate) id: LedgerTxId,
    pub(crate) owner: String,
    pub(crate) tags: Vec<Tag>,
    pub(crate) data: Vec<u8>,
    pub(crate) data_root: [u8; 32],
    pub(crate) reward: Winston,
    pub(crate) signature: [u8; 64],
}

impl SignedTransaction {
    /// Content-derived id.
    pub fn id(&self) -> &LedgerTxId {
        &self.id
    }

    /// Owner public key (base64url).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Tags in attachment order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload length.
    pub fn data_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// SHA-256 of the payload.
    pub fn data_root(&self) -> &[u8; 32] {
        &self.data_root
    }

    /// Fee paid.
    pub fn reward(&self) -> Winston {
        self.reward
    }

    /// Ed25519 signature over the preimage.
    pub fn signature(&self) -> &[u8; 64] {
        &self.signature
    }

    /// Wire representation for `POST /tx`.
    pub fn to_envelope(&self) -> TransactionEnvelope {
        TransactionEnvelope {
            format: TX_FORMAT,
            id: self.id.to_string(),
            owner: self.owner.clone(),
            tags: self.tags.iter().map(EnvelopeTag::encode).collect(),
            data: URL_SAFE_NO_PAD.encode(&self.data),
            data_size: self.data_size().to_string(),
            data_root: URL_SAFE_NO_PAD.encode(self.data_root),
            reward: self.reward.to_string(),
            signature: URL_SAFE_NO_PAD.encode(self.signature),
        }
    }
}

/// Tag as carried on the wire: base64url name and value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeTag {
    /// base64url tag name.
    pub name: String,
    /// base64url tag value.
    pub value: String,
}

impl EnvelopeTag {
    fn encode(tag: &Tag) -> Self {
        Self {
            name: URL_SAFE_NO_PAD.encode(tag.name.as_bytes()),
            value: URL_SAFE_NO_PAD.encode(tag.value.as_bytes()),
        }
    }

    /// Decode into a UTF-8 tag.
    pub fn decode(&self) -> Result<Tag, LedgerError> {
        Ok(Tag::new(
            decode_utf8(&self.name)?,
            decode_utf8(&self.value)?,
        ))
    }
}

fn decode_utf8(value: &str) -> Result<String, LedgerError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| LedgerError::InvalidTag(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LedgerError::InvalidTag(e.to_string()))
}

/// JSON envelope exchanged with the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// Format version.
    pub format: u8,
    /// Transaction id.
    pub id: String,
    /// Owner public key (base64url).
    pub owner: String,
    /// Encoded tags.
    #[serde(default)]
    pub tags: Vec<EnvelopeTag>,
    /// Payload (base64url). Gateways omit it when reading transactions back.
    #[serde(default)]
    pub data: String,
    /// Payload length, decimal.
    pub data_size: String,
    /// SHA-256 of the payload (base64url).
    #[serde(default)]
    pub data_root: String,
    /// Fee, decimal.
    pub reward: String,
    /// Signature (base64url).
    pub signature: String,
}

impl TransactionEnvelope {
    /// Decode all tags.
    pub fn decoded_tags(&self) -> Result<Vec<Tag>, LedgerError> {
        self.tags.iter().map(EnvelopeTag::decode).collect()
    }
}
