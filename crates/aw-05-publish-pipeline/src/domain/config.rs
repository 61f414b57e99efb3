//! Pipeline configuration.

use std::time::Duration;

use super::PollPolicy;

/// Timeouts for every external call, plus the confirmation watch switch.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Index store reads and writes.
    pub store_timeout: Duration,
    /// Metadata and content retrieval.
    pub fetch_timeout: Duration,
    /// Each ledger call (quote, broadcast, poll).
    pub ledger_timeout: Duration,
    /// Spawn a confirmation watch after each successful publish.
    pub watch_confirmations: bool,
    /// Polling bounds for the watch.
    pub poll_policy: PollPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(60),
            ledger_timeout: Duration::from_secs(20),
            watch_confirmations: false,
            poll_policy: PollPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Check timeouts and the poll policy.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("store_timeout", self.store_timeout),
            ("fetch_timeout", self.fetch_timeout),
            ("ledger_timeout", self.ledger_timeout),
        ] {
            if value.is_zero() {
                return Err(format!("{name} must be non-zero"));
            }
        }
        self.poll_policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ledger_timeout, Duration::from_secs(20));
        assert!(!config.watch_confirmations);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = PipelineConfig {
            fetch_timeout: Duration::ZERO,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err("fetch_timeout must be non-zero".to_string())
        );
    }
}
