//! # Outbound Ports
//!
//! Source archive access used by the publish pipeline.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use shared_types::{Author, DocumentId, DocumentMetadata};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{EncodedContent, FetchError, FetchedDocument};

/// Metadata fetcher - outbound port.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Retrieve bibliographic metadata and encoded content for a document.
    async fn fetch(&self, document_id: &DocumentId) -> Result<FetchedDocument, FetchError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Deterministic fetcher for tests.
///
/// Unless a document was registered explicitly, every id resolves to
/// `MockMetadataFetcher::sample_document`.
#[derive(Default)]
pub struct MockMetadataFetcher {
    documents: RwLock<HashMap<DocumentId, FetchedDocument>>,
    missing: Vec<DocumentId>,
    should_fail: bool,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl MockMetadataFetcher {
    /// Fetcher that resolves every id to a sample document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specific document.
    pub fn with_document(self, document_id: DocumentId, document: FetchedDocument) -> Self {
        self.documents.write().insert(document_id, document);
        self
    }

    /// Resolve `document_id` to `FetchError::NotFound`.
    pub fn with_missing(mut self, document_id: DocumentId) -> Self {
        self.missing.push(document_id);
        self
    }

    /// Fail every fetch with a network error.
    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetch calls.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Sample document: title `T`, one author, link `.../pdf/{id}`, and a
    /// small base64 PDF stub.
    pub fn sample_document(document_id: &DocumentId) -> FetchedDocument {
        FetchedDocument {
            metadata: DocumentMetadata {
                authors: vec![Author::new("Ada Lovelace")],
                title: "T".to_string(),
                summary: "S".to_string(),
                published: "2021-01-01T00:00:00Z".to_string(),
                updated: "2021-01-01T00:00:00Z".to_string(),
                content_link: format!("http://arxiv.org/pdf/{document_id}"),
            },
            content: EncodedContent {
                encoding: "base64".to_string(),
                content_type: "application/pdf".to_string(),
                data: STANDARD.encode(format!("%PDF-1.4 {document_id}")),
            },
        }
    }
}

#[async_trait]
impl MetadataFetcher for MockMetadataFetcher {
    async fn fetch(&self, document_id: &DocumentId) -> Result<FetchedDocument, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(FetchError::Network("Mock failure".to_string()));
        }
        if self.missing.contains(document_id) {
            return Err(FetchError::NotFound(document_id.clone()));
        }
        let registered = self.documents.read().get(document_id).cloned();
        Ok(registered.unwrap_or_else(|| Self::sample_document(document_id)))
    }
}
