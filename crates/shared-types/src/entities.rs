//! # Core Domain Entities
//!
//! The Document Record and its parts.
//!
//! ## Lifecycle
//!
//! A record starts as a bare `DocumentId`, gains `DocumentMetadata` once the
//! source archive has been read, and gains a `LedgerTxId` plus an observed
//! status code once the ledger accepted the broadcast. Only then is it
//! persisted. After persistence only `ledger_status` may change.

use crate::errors::{DocumentIdError, MAX_DOCUMENT_ID_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// External document identifier (e.g. an arXiv id such as `2101.00001`).
///
/// Globally unique, caller supplied, and the index store's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate and wrap a raw identifier.
    ///
    /// Accepts `[A-Za-z0-9./-]`, rejects leading `/` and `..` segments so the
    /// id can be interpolated into upstream URLs.
    pub fn parse(raw: &str) -> Result<Self, DocumentIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        if trimmed.len() > MAX_DOCUMENT_ID_LEN {
            return Err(DocumentIdError::TooLong {
                len: trimmed.len(),
                max: MAX_DOCUMENT_ID_LEN,
            });
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-')))
        {
            return Err(DocumentIdError::InvalidCharacter(c));
        }
        if trimmed.starts_with('/') || trimmed.contains("..") {
            return Err(DocumentIdError::PathLike(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ledger transaction id (base64url, derived from the signed content).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerTxId(pub String);

impl LedgerTxId {
    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedgerTxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// METADATA
// =============================================================================

/// A paper author as reported by the source archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
}

impl Author {
    /// Create an author.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Bibliographic record of a document. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Authors in archive order.
    pub authors: Vec<Author>,
    /// Title, whitespace-normalized.
    pub title: String,
    /// Abstract, whitespace-normalized.
    pub summary: String,
    /// First publication timestamp (RFC 3339 as reported upstream).
    pub published: String,
    /// Last update timestamp (RFC 3339 as reported upstream).
    pub updated: String,
    /// Link to the binary content (PDF).
    pub content_link: String,
}

impl DocumentMetadata {
    /// Authors rendered the way they are persisted and tagged: a JSON array
    /// of `{"name": ..}` objects.
    pub fn authors_json(&self) -> String {
        serde_json::to_string(&self.authors).unwrap_or_else(|_| "[]".to_string())
    }
}

// =============================================================================
// LEDGER STATUS
// =============================================================================

/// Coarse ledger status derived from network status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerStatus {
    /// Submitted, not yet part of the permanent record.
    Pending,
    /// Included in the permanent record.
    Confirmed,
    /// The network refused the transaction.
    Rejected,
    /// The network does not know the transaction (yet).
    Unknown,
}

impl LedgerStatus {
    /// Interpret a broadcast (`POST /tx`) response code.
    ///
    /// 200 and 208 ("already processed") both mean the network holds the
    /// transaction; confirmation is still outstanding.
    pub fn from_broadcast_code(code: u16) -> Self {
        match code {
            200 | 208 => Self::Pending,
            400..=499 => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    /// Interpret a status poll (`GET /tx/{id}/status`) response code.
    pub fn from_poll_code(code: u16) -> Self {
        match code {
            200 => Self::Confirmed,
            202 => Self::Pending,
            400 | 410 | 422 => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    /// Whether polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected)
    }
}

// =============================================================================
// DOCUMENT RECORD
// =============================================================================

/// A document anchored on the ledger, as persisted in the index store.
///
/// Written at most once per `document_id`, and only after `ledger_tx_id` is
/// known. Every field serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Primary key.
    pub document_id: DocumentId,
    /// Authors, persisted as a JSON string.
    #[serde(with = "json_string")]
    pub authors: Vec<Author>,
    /// Last update timestamp.
    pub updated: String,
    /// Publication timestamp.
    pub published: String,
    /// Title.
    pub title: String,
    /// Abstract.
    pub summary: String,
    /// Link to the binary content.
    pub content_link: String,
    /// Ledger transaction id.
    pub ledger_tx_id: LedgerTxId,
    /// Last observed network status code, persisted as a decimal string.
    #[serde(with = "code_string")]
    pub ledger_status: u16,
}

impl DocumentRecord {
    /// Assemble a record from fetched metadata and a broadcast outcome.
    pub fn new(
        document_id: DocumentId,
        metadata: DocumentMetadata,
        ledger_tx_id: LedgerTxId,
        ledger_status: u16,
    ) -> Self {
        Self {
            document_id,
            authors: metadata.authors,
            updated: metadata.updated,
            published: metadata.published,
            title: metadata.title,
            summary: metadata.summary,
            content_link: metadata.content_link,
            ledger_tx_id,
            ledger_status,
        }
    }
}

mod json_string {
    use super::Author;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(authors: &[Author], s: S) -> Result<S::Ok, S::Error> {
        let json = serde_json::to_string(authors).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&json)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Author>, D::Error> {
        let raw = String::deserialize(d)?;
        serde_json::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

mod code_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(code: &u16, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&code.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u16, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> DocumentMetadata {
        DocumentMetadata {
            authors: vec![Author::new("Ada Lovelace"), Author::new("Alan Turing")],
            title: "T".to_string(),
            summary: "S".to_string(),
            published: "2021-01-01T00:00:00Z".to_string(),
            updated: "2021-01-02T00:00:00Z".to_string(),
            content_link: "http://arxiv.org/pdf/2101.00001v1".to_string(),
        }
    }

    #[test]
    fn test_document_id_accepts_arxiv_forms() {
        assert!(DocumentId::parse("2101.00001").is_ok());
        assert!(DocumentId::parse("2101.00001v2").is_ok());
        assert!(DocumentId::parse("hep-th/9901001").is_ok());
        assert_eq!(DocumentId::parse("  2101.00001 ").unwrap().as_str(), "2101.00001");
    }

    #[test]
    fn test_document_id_rejects_bad_input() {
        assert_eq!(DocumentId::parse("   "), Err(DocumentIdError::Empty));
        assert!(matches!(
            DocumentId::parse("2101 00001"),
            Err(DocumentIdError::InvalidCharacter(' '))
        ));
        assert!(matches!(
            DocumentId::parse("../etc/passwd"),
            Err(DocumentIdError::PathLike(_))
        ));
        assert!(matches!(
            DocumentId::parse("/abs"),
            Err(DocumentIdError::PathLike(_))
        ));
        let long = "1".repeat(MAX_DOCUMENT_ID_LEN + 1);
        assert!(matches!(
            DocumentId::parse(&long),
            Err(DocumentIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_document_id_deserialize_validates() {
        let ok: Result<DocumentId, _> = serde_json::from_str("\"2101.00001\"");
        assert!(ok.is_ok());
        let bad: Result<DocumentId, _> = serde_json::from_str("\"a?b\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_record_persists_all_fields_as_strings() {
        let record = DocumentRecord::new(
            DocumentId::parse("2101.00001").unwrap(),
            sample_metadata(),
            LedgerTxId("abc123".to_string()),
            200,
        );
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 9);
        assert!(object.values().all(|v| v.is_string()));
        assert_eq!(object["documentId"], "2101.00001");
        assert_eq!(object["ledgerTxId"], "abc123");
        assert_eq!(object["ledgerStatus"], "200");
        assert_eq!(
            object["authors"],
            "[{\"name\":\"Ada Lovelace\"},{\"name\":\"Alan Turing\"}]"
        );

        let back: DocumentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_broadcast_codes() {
        assert_eq!(LedgerStatus::from_broadcast_code(200), LedgerStatus::Pending);
        assert_eq!(LedgerStatus::from_broadcast_code(208), LedgerStatus::Pending);
        assert_eq!(LedgerStatus::from_broadcast_code(400), LedgerStatus::Rejected);
        assert_eq!(LedgerStatus::from_broadcast_code(503), LedgerStatus::Unknown);
    }

    #[test]
    fn test_poll_codes() {
        assert_eq!(LedgerStatus::from_poll_code(200), LedgerStatus::Confirmed);
        assert_eq!(LedgerStatus::from_poll_code(202), LedgerStatus::Pending);
        assert_eq!(LedgerStatus::from_poll_code(404), LedgerStatus::Unknown);
        assert!(LedgerStatus::Confirmed.is_terminal());
        assert!(!LedgerStatus::Pending.is_terminal());
    }
}
