//! Prometheus metrics for ecosort.
//!
//! Covers:
//! - Remote store calls (count by outcome, latency)
//! - Transport selected at startup
//! - HTTP requests per route
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// Remote store calls.
/// Labels: op (read/merge), outcome (ok/timeout/transport/status/malformed/...)
pub static STORE_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ecosort_store_requests_total",
        "Total remote store requests",
        &["op", "outcome"]
    )
    .unwrap()
});

/// Remote store call latency in milliseconds.
pub static STORE_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ecosort_store_latency_ms",
        "Remote store request latency in milliseconds",
        &["op"],
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2000.0, 3000.0, 5000.0]
    )
    .unwrap()
});

/// Transport selected at startup (1 = active).
/// Labels: mode (uninitialized/authenticated/anonymous)
pub static CONNECTION_MODE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "ecosort_connection_mode",
        "Remote store transport selected at startup (1=active)",
        &["mode"]
    )
    .unwrap()
});

/// HTTP requests served.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ecosort_http_requests_total",
        "Total HTTP API requests",
        &["route"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a remote store call.
    pub fn store_request(op: &str, outcome: &str) {
        STORE_REQUESTS_TOTAL
            .with_label_values(&[op, outcome])
            .inc();
    }

    /// Record remote store call latency.
    pub fn store_latency(op: &str, latency_ms: f64) {
        STORE_LATENCY_MS.with_label_values(&[op]).observe(latency_ms);
    }

    /// Set the active connection mode.
    /// Only the active mode is set to 1, all others to 0.
    pub fn connection_mode(mode: &str) {
        for m in &["uninitialized", "authenticated", "anonymous"] {
            CONNECTION_MODE.with_label_values(&[m]).set(0.0);
        }
        CONNECTION_MODE.with_label_values(&[mode]).set(1.0);
    }

    /// Record an HTTP request.
    pub fn http_request(route: &str) {
        HTTP_REQUESTS_TOTAL.with_label_values(&[route]).inc();
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn encode() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
