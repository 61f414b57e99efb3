//! Log subscriber setup.
//!
//! Containers get JSON lines so the shipper can index `document_id`,
//! `tx_id` and `phase` as fields. Elsewhere a colored human format is used.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails on an unparsable filter directive or when another global
/// subscriber is already in place.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::LoggerInit(format!("{}: {e}", config.log_level)))?;

    let located = config.with_source_location;
    let output = if config.json_logs {
        fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_file(located)
            .with_line_number(located)
            .boxed()
    } else {
        fmt::layer()
            .with_file(located)
            .with_line_number(located)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|e| TelemetryError::LoggerInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        filter = %config.log_level,
        "logging ready"
    );
    Ok(())
}
