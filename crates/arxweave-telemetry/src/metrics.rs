//! Prometheus metrics for Arxweave subsystems.
//!
//! All metrics follow the naming convention: `aw_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., publish outcomes)
//! - **Histogram**: Distribution of values (e.g., ledger call latency)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Once;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PUBLISH PIPELINE METRICS (Subsystem 5)
    // =========================================================================

    /// Publish runs by outcome
    pub static ref PUBLISH_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("aw_pipeline_publish_total", "Publish runs by outcome"),
        &["outcome"]  // outcome: published/duplicate/failed
    ).expect("metric creation failed");

    /// Publish failures by phase
    pub static ref PUBLISH_FAILURES: CounterVec = CounterVec::new(
        Opts::new("aw_pipeline_failures_total", "Publish failures by pipeline phase"),
        &["phase"]
    ).expect("metric creation failed");

    /// End-to-end publish duration
    pub static ref PUBLISH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "aw_pipeline_publish_duration_seconds",
            "Time from existence check to index write"
        ).buckets(exponential_buckets(0.05, 2.0, 12).unwrap())
    ).expect("metric creation failed");

    /// Ledger transactions without an index entry (operator action required)
    pub static ref RECONCILIATION_GAPS: Counter = Counter::new(
        "aw_pipeline_reconciliation_gaps_total",
        "Broadcast transactions whose index write failed"
    ).expect("metric creation failed");

    /// Confirmation watch outcomes
    pub static ref CONFIRMATION_WATCHES: CounterVec = CounterVec::new(
        Opts::new("aw_pipeline_confirmation_watches_total", "Confirmation watch outcomes"),
        &["outcome"]  // outcome: confirmed/rejected/cancelled/timeout/error
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER CLIENT METRICS (Subsystem 2)
    // =========================================================================

    /// Broadcast responses by HTTP status
    pub static ref BROADCAST_RESPONSES: CounterVec = CounterVec::new(
        Opts::new("aw_ledger_broadcast_responses_total", "Broadcast responses by status code"),
        &["status"]
    ).expect("metric creation failed");

    /// Ledger network call latency
    pub static ref LEDGER_CALL_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "aw_ledger_call_duration_seconds",
            "Time spent in ledger network calls"
        ).buckets(exponential_buckets(0.01, 2.0, 12).unwrap()),
        &["operation"]  // operation: quote/broadcast/poll/fetch/balance
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Subsystem errors by type
    pub static ref SUBSYSTEM_ERRORS: CounterVec = CounterVec::new(
        Opts::new("aw_subsystem_errors_total", "Errors by subsystem and type"),
        &["subsystem", "error_type"]
    ).expect("metric creation failed");
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent: later calls are no-ops.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let mut result = Ok(());
    REGISTER.call_once(|| {
        let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
            // Pipeline
            Box::new(PUBLISH_OUTCOMES.clone()),
            Box::new(PUBLISH_FAILURES.clone()),
            Box::new(PUBLISH_DURATION.clone()),
            Box::new(RECONCILIATION_GAPS.clone()),
            Box::new(CONFIRMATION_WATCHES.clone()),
            // Ledger
            Box::new(BROADCAST_RESPONSES.clone()),
            Box::new(LEDGER_CALL_DURATION.clone()),
            // Errors
            Box::new(SUBSYSTEM_ERRORS.clone()),
        ];

        for metric in metrics {
            if let Err(e) = REGISTRY.register(metric) {
                result = Err(TelemetryError::MetricsInit(e.to_string()));
                return;
            }
        }
    });
    result
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
