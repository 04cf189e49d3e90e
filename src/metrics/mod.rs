// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, REQUESTS_TOTAL, REQUEST_DURATION, TOKEN_ACQUISITIONS, UPSTREAM_CALLS,
    UPSTREAM_DURATION,
};

/// Helper to record relay request metrics
pub fn record_request(endpoint: &str, outcome: &str, duration_secs: f64) {
    REQUESTS_TOTAL.with_label_values(&[endpoint, outcome]).inc();

    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record Vertex AI call metrics
///
/// `status` is the HTTP status code, or `timeout`/`error` when no response arrived.
pub fn record_upstream_call(status: &str, duration_secs: f64) {
    UPSTREAM_CALLS.with_label_values(&[status]).inc();

    UPSTREAM_DURATION
        .with_label_values(&[status])
        .observe(duration_secs);
}

/// Helper to record token acquisition metrics
pub fn record_token_acquisition(success: bool) {
    let status = if success { "success" } else { "failure" };
    TOKEN_ACQUISITIONS.with_label_values(&[status]).inc();
}
