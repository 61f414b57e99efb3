//! # Arxweave Telemetry
//!
//! Log subscriber and Prometheus registry shared by the node's subsystems.
//! The gateway renders [`encode_metrics`] on `/metrics`.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ARXWEAVE_LOG_LEVEL` | `info` | Log filter directive |
//! | `ARXWEAVE_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `ARXWEAVE_SERVICE_NAME` | `arxweave` | Service name in logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BROADCAST_RESPONSES, CONFIRMATION_WATCHES,
    LEDGER_CALL_DURATION, PUBLISH_DURATION, PUBLISH_FAILURES, PUBLISH_OUTCOMES,
    RECONCILIATION_GAPS, SUBSYSTEM_ERRORS,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("log subscriber setup failed: {0}")]
    LoggerInit(String),

    #[error("metrics registry failure: {0}")]
    MetricsInit(String),
}

/// Register every collector, then install the log subscriber.
///
/// Metrics come first so that a node whose subscriber is already installed
/// (tests, embedding hosts) still exports counters.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_telemetry_surfaces_bad_filter() {
        let config = TelemetryConfig {
            log_level: "aw_05=loud".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::LoggerInit(_))
        ));
        // Registration happened before the subscriber failed.
        assert!(encode_metrics().is_ok());
    }
}
