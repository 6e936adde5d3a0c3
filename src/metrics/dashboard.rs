use crate::metrics::Status;
use metrics::{counter, describe_counter, describe_gauge, gauge};

pub(super) fn register_metrics() {
    // Count of monitor cycles. Labeled with the status (success or failure).
    describe_counter!("monitor_cycles_total", "Total number of monitor cycles");

    describe_gauge!(
        "triggered_alerts",
        "Number of triggered alerts in the latest snapshot"
    );

    describe_gauge!(
        "last_successful_refresh_timestamp",
        "Timestamp of the last successful triggered alerts refresh"
    );

    // Count of alert submissions. Labeled with the status (success or failure).
    describe_counter!(
        "alerts_created_total",
        "Total number of alert configurations submitted"
    );
}

/// Record a monitor cycle with the given status
pub fn record_monitor_cycle(status: Status) {
    counter!("monitor_cycles_total", "status" => status.to_string()).increment(1);
}

/// Record the size of the latest triggered alerts snapshot
pub fn record_triggered_alerts(count: usize) {
    gauge!("triggered_alerts").set(count as f64);
    gauge!("last_successful_refresh_timestamp").set(chrono::Utc::now().timestamp() as f64);
}

/// Record an alert submission with the given status
pub fn record_alert_created(status: Status) {
    counter!("alerts_created_total", "status" => status.to_string()).increment(1);
}
