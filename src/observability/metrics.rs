//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_notify_requests_total` (counter): inbound requests by outcome
//! - `relay_messages_enqueued_total` (counter): messages accepted into the queue
//! - `relay_deliveries_total` (counter): outbound calls by outcome
//! - `relay_delivery_duration_seconds` (histogram): outbound call latency
//! - `relay_queue_depth` (gauge): messages waiting for the dispatcher

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Outcome of one `/notify` request: accepted, noop, bad_request, queue_full, closed.
pub fn record_notify(outcome: &'static str) {
    ::metrics::counter!("relay_notify_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_enqueued(count: usize) {
    ::metrics::counter!("relay_messages_enqueued_total").increment(count as u64);
}

/// Outcome of one outbound call: delivered or failed.
pub fn record_delivery(outcome: &'static str, start: Instant) {
    ::metrics::counter!("relay_deliveries_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("relay_delivery_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn set_queue_depth(depth: usize) {
    ::metrics::gauge!("relay_queue_depth").set(depth as f64);
}
