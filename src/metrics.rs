//! Prometheus metrics for collection runs.
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter, so the
//! helpers are safe to call from tests and library users.

use metrics::{counter, histogram};
use std::net::SocketAddr;
use tracing::{info, warn};

pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

pub fn record_fetch_success(duration_secs: f64, bytes: usize) {
    counter!("agenda_fetch_success_total").increment(1);
    histogram!("agenda_fetch_duration_seconds").record(duration_secs);
    histogram!("agenda_fetch_payload_bytes").record(bytes as f64);
}

pub fn record_fetch_error() {
    counter!("agenda_fetch_error_total").increment(1);
}

pub fn record_source_success(source: &'static str, candidates: usize) {
    counter!("agenda_source_runs_total", "source" => source, "outcome" => "ok").increment(1);
    counter!("agenda_candidates_extracted_total", "source" => source).increment(candidates as u64);
}

pub fn record_source_failure(source: &'static str) {
    counter!("agenda_source_runs_total", "source" => source, "outcome" => "error").increment(1);
}

/// Candidates a source returned that the store refused.
pub fn record_ingest_failure(source: &'static str) {
    counter!("agenda_ingest_failures_total", "source" => source).increment(1);
}

pub fn record_ingested() {
    counter!("agenda_events_ingested_total").increment(1);
}

pub fn record_duplicate() {
    counter!("agenda_events_duplicate_total").increment(1);
}

/// Dates that could not be read and were replaced by the collection time.
pub fn record_date_fallback() {
    counter!("agenda_date_fallback_total").increment(1);
}

pub fn record_run(duration_secs: f64, errors: usize) {
    counter!("agenda_collection_runs_total").increment(1);
    counter!("agenda_collection_errors_total").increment(errors as u64);
    histogram!("agenda_collection_duration_seconds").record(duration_secs);
}
