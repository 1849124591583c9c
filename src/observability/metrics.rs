//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): dispatched requests by `outcome`
//!   (`routed`, `not_configured`)
//! - `proxy_upstream_errors_total` (counter): failed proxy forwards
//! - `proxy_config_reloads_total` (counter): reload attempts by `result`
//! - `proxy_routes` (gauge): hostnames in the current routing table
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_dispatch(routed: bool) {
    let outcome = if routed { "routed" } else { "not_configured" };
    metrics::counter!("proxy_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_upstream_error() {
    metrics::counter!("proxy_upstream_errors_total").increment(1);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("proxy_config_reloads_total", "result" => result).increment(1);
}

pub fn set_route_count(count: usize) {
    metrics::gauge!("proxy_routes").set(count as f64);
}
