use crate::metrics::Timer;
use metrics::{counter, describe_counter, describe_histogram};

pub(super) fn register_metrics() {
    // Count of failed requests against the remote API. Labeled with the target.
    describe_counter!(
        "external_request_failures_total",
        "Total number of failed requests against the remote API"
    );

    // Latency of remote API requests, labeled with the target.
    describe_histogram!(
        "external_request_duration_seconds",
        "Duration of remote API requests in seconds"
    );

    // Attempts beyond the first made by the retrying fetch. Labeled with the target.
    describe_counter!("fetch_retries_total", "Total number of retried fetches");
}

/// Record a failed request for a given target
pub fn record_external_request_failure(target: Target) {
    counter!("external_request_failures_total", "target" => target.to_string()).increment(1);
}

/// Create a timer for a request to a given target
pub fn external_request_timer(target: Target) -> Timer {
    Timer::new("external_request_duration_seconds").with_label("target", target.to_string())
}

/// Record one retry of a fetch for a given target
pub fn record_fetch_retry(target: Target) {
    counter!("fetch_retries_total", "target" => target.to_string()).increment(1);
}

/// Remote API resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Demands,
    CapacityGroups,
    Alerts,
    TriggeredAlerts,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Demands => write!(f, "demands"),
            Target::CapacityGroups => write!(f, "capacity_groups"),
            Target::Alerts => write!(f, "alerts"),
            Target::TriggeredAlerts => write!(f, "triggered_alerts"),
        }
    }
}
