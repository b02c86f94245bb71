//! HostelHub Observability Module
//!
//! Provides:
//! - Structured logging via `tracing` (console plus optional JSON files)
//! - Per-request logging middleware
//! - Metrics collection via Prometheus
//!
//! Metrics can be switched off at runtime with `OBSERVABILITY_ENABLED=false`;
//! logging is always on.
//!
//! # Examples
//!
//! ```no_run
//! use hostelhub_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     let metrics_handle = init_metrics();
//!     // ... application code ...
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware,
    track_gate_rejection, track_identity_registered, track_login_failure, track_login_success,
    track_token_issued,
};
