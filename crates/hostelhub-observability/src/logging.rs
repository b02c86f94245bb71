use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const NOISY_TARGETS: &str = "tower_http=warn,hyper=warn,h2=warn,sqlx=warn";

fn default_directives(log_level: &str) -> String {
    format!("hostelhub={log_level},{NOISY_TARGETS}")
}

/// Logs one event per request with its id, route, status, and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Server error"
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Client error"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status = %status.as_u16(),
            latency_ms = %latency.as_millis(),
            "Request completed"
        );
    }

    response
}

/// Installs the global tracing subscriber.
///
/// - Console: compact format, filtered by `RUST_LOG` if set, otherwise
///   `hostelhub=<LOG_LEVEL>` (default `info`) with noisy dependencies at `warn`.
/// - File: when `LOG_DIR` is set, daily-rolling JSON logs at `info` and above,
///   suitable for ingestion by a log shipper.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let json_layer = match std::env::var("LOG_DIR") {
        Ok(log_dir) => match std::fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hostelhub.json");
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(appender)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_filter(EnvFilter::new(default_directives("info"))),
                )
            }
            Err(e) => {
                eprintln!("Failed to create log directory {}: {}. File logging disabled", log_dir, e);
                None
            }
        },
        Err(_) => None,
    };

    let file_logging = json_layer.is_some();

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .is_ok()
    {
        info!(file_logging, "Tracing initialized");
    }
}
