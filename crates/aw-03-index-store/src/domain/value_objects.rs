//! # Value Objects
//!
//! Outcomes of conditional writes and the row codec shared by key-value
//! backends.

use shared_types::{DocumentId, DocumentRecord};

use super::errors::IndexStoreError;

/// Result of `insert_if_absent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was written.
    Inserted,
    /// A record already existed for the id and was left untouched.
    AlreadyExists(Box<DocumentRecord>),
}

impl InsertOutcome {
    /// Whether this call wrote the record.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Row key of a record in byte-keyed backends.
pub fn record_key(document_id: &DocumentId) -> Vec<u8> {
    document_id.as_str().as_bytes().to_vec()
}

/// Serialize a record as its string-typed JSON row.
pub fn encode_record(record: &DocumentRecord) -> Result<Vec<u8>, IndexStoreError> {
    serde_json::to_vec(record).map_err(|e| IndexStoreError::Serialization(e.to_string()))
}

/// Deserialize a stored row.
pub fn decode_record(bytes: &[u8]) -> Result<DocumentRecord, IndexStoreError> {
    serde_json::from_slice(bytes).map_err(|e| IndexStoreError::Serialization(e.to_string()))
}
