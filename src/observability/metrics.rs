//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upstream_requests_total` (counter): forwarded requests by method, status
//! - `upstream_request_duration_seconds` (histogram): upstream latency
//! - `not_found_fallback_total` (counter): fallback fetches by outcome
//! - `not_found_fallback_duration_seconds` (histogram): fallback fetch latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("upstream_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one fallback fetch; `start` is unset when nothing was fetched.
pub fn record_fallback(outcome: &'static str, start: Option<Instant>) {
    counter!("not_found_fallback_total", "outcome" => outcome).increment(1);
    if let Some(start) = start {
        histogram!("not_found_fallback_duration_seconds", "outcome" => outcome)
            .record(start.elapsed().as_secs_f64());
    }
}
