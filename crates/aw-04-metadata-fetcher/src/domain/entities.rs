//! # Entities
//!
//! A fetched document: bibliographic metadata plus its content encoded for
//! ledger transport.

use shared_types::DocumentMetadata;

/// Binary content encoded for transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedContent {
    /// Transport encoding (`base64`).
    pub encoding: String,
    /// Media type of the decoded bytes.
    pub content_type: String,
    /// Encoded text. Its byte length is what the ledger charges for.
    pub data: String,
}

impl EncodedContent {
    /// Ledger payload bytes.
    pub fn payload(&self) -> Vec<u8> {
        self.data.as_bytes().to_vec()
    }

    /// Payload length in bytes.
    pub fn byte_size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of a successful fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Bibliographic metadata.
    pub metadata: DocumentMetadata,
    /// Encoded content.
    pub content: EncodedContent,
}
