//! Metrics collection and exposition.
//!
//! # Metrics
//! - `form_relay_http_requests_total` (counter): requests by method, status
//! - `form_relay_relayed_total` (counter): relay sends by outcome
//! - `form_relay_datagrams_total` (counter): datagrams received by the ingest server
//! - `form_relay_merges_total` (counter): ingest outcomes (stored, malformed, oversized, failed)
//! - `form_relay_store_entries` (gauge): entries in the store after the last merge

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_http_request(method: &str, status: u16) {
    metrics::counter!(
        "form_relay_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_relay(outcome: &'static str) {
    metrics::counter!("form_relay_relayed_total", "outcome" => outcome).increment(1);
}

pub fn record_datagram() {
    metrics::counter!("form_relay_datagrams_total").increment(1);
}

pub fn record_merge(outcome: &'static str) {
    metrics::counter!("form_relay_merges_total", "outcome" => outcome).increment(1);
}

pub fn set_store_entries(count: usize) {
    metrics::gauge!("form_relay_store_entries").set(count as f64);
}
