//! Prometheus metrics and structured logging for ecosort.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus metrics for remote store calls and the HTTP surface

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
