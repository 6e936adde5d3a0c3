use crate::metrics::Timer;
use metrics::{counter, describe_counter, describe_histogram};

pub(super) fn register_metrics() {
    describe_counter!(
        "http_requests_total",
        "Total number of HTTP requests served per endpoint"
    );

    describe_histogram!(
        "http_request_duration_seconds",
        "Duration of serving HTTP requests in seconds per endpoint"
    );
}

/// Record an HTTP request for a given endpoint
pub fn record_http_request(endpoint: &'static str) {
    counter!("http_requests_total", "endpoint" => endpoint).increment(1);
}

/// Create a timer for serving a request on the given endpoint
pub fn http_request_timer(endpoint: &'static str) -> Timer {
    Timer::new("http_request_duration_seconds").with_label("endpoint", endpoint)
}
