//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (downstream calls, orchestrations)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_downstream_calls_total` (counter): calls by resource, outcome
//! - `gateway_downstream_call_duration_seconds` (histogram): per-call latency
//! - `gateway_orchestrations_total` (counter): orchestrations by operation, outcome
//! - `gateway_orchestration_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Outcome label is `ok` or the error kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::downstream::ErrorKind;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one settled downstream call.
pub fn record_call(resource: &str, failure: Option<ErrorKind>, started: Instant) {
    let outcome = failure.map_or("ok", |kind| kind.as_str());
    counter!(
        "gateway_downstream_calls_total",
        "resource" => resource.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "gateway_downstream_call_duration_seconds",
        "resource" => resource.to_string(),
        "outcome" => outcome
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record one finished orchestration.
pub fn record_orchestration(operation: &str, succeeded: bool, started: Instant) {
    let outcome = if succeeded { "ok" } else { "failed" };
    counter!(
        "gateway_orchestrations_total",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "gateway_orchestration_duration_seconds",
        "operation" => operation.to_string(),
        "outcome" => outcome
    )
    .record(started.elapsed().as_secs_f64());
}
