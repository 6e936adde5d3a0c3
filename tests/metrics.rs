use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use capacity_alerts::{
    http::{AppState, create_router},
    metrics::register_metrics,
    monitor::Snapshot,
};
use tower::ServiceExt;

// Installs the global recorder, so it lives in its own test binary
#[tokio::test]
async fn metrics_are_rendered_once_registered() {
    register_metrics().unwrap();

    let state = AppState {
        triggered: Snapshot::default(),
    };
    let response = create_router(state)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let rendered = String::from_utf8(body.to_vec()).unwrap();

    assert!(rendered.contains("build_info"));
    assert!(rendered.contains("process_start_time_seconds"));
}
