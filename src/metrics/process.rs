use metrics::{describe_gauge, gauge};

pub(super) fn register_metrics() {
    describe_gauge!(
        "process_start_time_seconds",
        "Start time of the process in seconds since the Unix epoch"
    );

    describe_gauge!(
        "build_info",
        "Build information of the application, labeled by name and version"
    );

    gauge!("process_start_time_seconds").set(chrono::Utc::now().timestamp() as f64);
    gauge!(
        "build_info",
        "name" => env!("CARGO_PKG_NAME"),
        "version" => env!("CARGO_PKG_VERSION")
    )
    .set(1.0);
}
