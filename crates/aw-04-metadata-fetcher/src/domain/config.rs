//! Archive connection settings.

use std::time::Duration;

use super::errors::FetchError;

/// Default arXiv API endpoint.
pub const DEFAULT_ARXIV_API_URL: &str = "https://export.arxiv.org/api";

/// Arxiv fetcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivConfig {
    /// API base URL (the `/query` endpoint is appended).
    pub api_url: String,
    /// Timeout for each HTTP request.
    pub request_timeout: Duration,
    /// Largest PDF accepted, in bytes, before encoding.
    pub max_content_bytes: u64,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ARXIV_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            max_content_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ArxivConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), FetchError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(FetchError::Config(format!(
                "api_url must be http(s): {}",
                self.api_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(FetchError::Config("request_timeout must be > 0".into()));
        }
        if self.max_content_bytes == 0 {
            return Err(FetchError::Config("max_content_bytes must be > 0".into()));
        }
        Ok(())
    }
}
