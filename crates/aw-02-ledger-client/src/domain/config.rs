//! Ledger gateway connection settings.

use std::time::Duration;

use super::errors::LedgerError;

/// Default ledger gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Ledger client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Base URL of the ledger gateway, without trailing slash.
    pub gateway_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !(self.gateway_url.starts_with("http://") || self.gateway_url.starts_with("https://")) {
            return Err(LedgerError::Config(format!(
                "gateway_url must be http(s): {}",
                self.gateway_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(LedgerError::Config("request_timeout must be > 0".into()));
        }
        Ok(())
    }

    /// Gateway URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.gateway_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = LedgerConfig {
            gateway_url: "ftp://arweave.net".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = LedgerConfig {
            gateway_url: "http://localhost:1984/".into(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:1984");
    }
}
