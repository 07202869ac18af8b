//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tracker_operations_total` (counter): completed writes by outcome
//! - `tracker_admissions_refused_total` (counter): refused submissions by reason
//! - `tracker_in_flight` (gauge): writes currently holding a permit
//! - `tracker_circuit_open_total` (counter): threshold crossings
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed, e.g. by [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed write.
pub fn record_outcome(outcome: &'static str) {
    metrics::counter!("tracker_operations_total", "outcome" => outcome).increment(1);
}

/// Record a refused submission.
pub fn record_refused(reason: &'static str) {
    metrics::counter!("tracker_admissions_refused_total", "reason" => reason).increment(1);
}

/// Record the number of writes holding a permit.
pub fn record_in_flight(in_flight: usize) {
    metrics::gauge!("tracker_in_flight").set(in_flight as f64);
}

/// Record the error threshold being crossed.
pub fn record_circuit_opened() {
    metrics::counter!("tracker_circuit_open_total").increment(1);
}
