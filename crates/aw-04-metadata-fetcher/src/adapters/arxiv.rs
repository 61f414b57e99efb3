//! arXiv HTTP adapter.
//!
//! 1. `GET {api}/query?id_list={id}` and parse the first Atom entry
//! 2. `GET {pdf link}` and base64-encode the bytes

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use shared_types::DocumentId;
use tracing::{debug, info};

use super::atom::parse_first_entry;
use crate::domain::{ArxivConfig, EncodedContent, FetchError, FetchedDocument};
use crate::ports::MetadataFetcher;

/// Payload encoding produced by this adapter.
pub const CONTENT_ENCODING: &str = "base64";

/// Media type of arXiv content.
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

/// Fetches metadata and PDFs from arXiv.
pub struct ArxivFetcher {
    client: Client,
    config: ArxivConfig,
}

impl ArxivFetcher {
    /// Create a fetcher.
    pub fn new(config: ArxivConfig) -> Result<Self, FetchError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let max = self.config.max_content_bytes;
        let response = self.get(url).await?;
        if let Some(size) = response.content_length() {
            if size > max {
                return Err(FetchError::ContentTooLarge { size, max });
            }
        }
        let bytes = response.bytes().await.map_err(map_reqwest)?;
        let size = bytes.len() as u64;
        if size > max {
            return Err(FetchError::ContentTooLarge { size, max });
        }
        if bytes.is_empty() {
            return Err(FetchError::EmptyContent);
        }
        Ok(bytes.to_vec())
    }
}

fn map_reqwest(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

#[async_trait]
impl MetadataFetcher for ArxivFetcher {
    async fn fetch(&self, document_id: &DocumentId) -> Result<FetchedDocument, FetchError> {
        let query_url = format!(
            "{}/query?id_list={}",
            self.config.api_url.trim_end_matches('/'),
            document_id
        );
        let feed = self
            .get(&query_url)
            .await?
            .text()
            .await
            .map_err(map_reqwest)?;

        let entry = parse_first_entry(&feed)?
            .ok_or_else(|| FetchError::NotFound(document_id.clone()))?;
        let metadata = entry.into_metadata(document_id)?;
        debug!(
            document_id = %document_id,
            content_link = %metadata.content_link,
            "[aw-04] Metadata parsed"
        );

        let pdf = self.download(&metadata.content_link).await?;
        let data = STANDARD.encode(&pdf);
        info!(
            document_id = %document_id,
            pdf_bytes = pdf.len(),
            encoded_bytes = data.len(),
            "[aw-04] Document fetched"
        );

        Ok(FetchedDocument {
            metadata,
            content: EncodedContent {
                encoding: CONTENT_ENCODING.to_string(),
                content_type: CONTENT_TYPE_PDF.to_string(),
                data,
            },
        })
    }
}
