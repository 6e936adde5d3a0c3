use crate::{
    config::Http,
    gateway::alert::TriggeredAlert,
    listing::{self, Direction, ListQuery, Listable, Page, SortState},
    metrics::{
        METRICS_HANDLE,
        http::{http_request_timer, record_http_request},
    },
    monitor::Snapshot,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use std::{net::SocketAddr, time::Duration};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub triggered: Snapshot,
}

/// Serve until `cancel` fires, then drain connections
pub async fn create_server(
    config: &Http,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Starting the web server");

    let app = create_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let handle = axum_server::Handle::new();

    tokio::spawn({
        let handle = handle.clone();

        async move {
            cancel.cancelled().await;
            handle.graceful_shutdown(Some(Duration::from_secs(5)));
        }
    });

    tracing::info!("Listening on {}", addr);

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}

/// Create the router for the application
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/alive", get(alive))
        .route("/metrics", get(metrics))
        .route("/triggered", get(triggered))
        .with_state(state)
}

/// This is the handler for the /alive path
async fn alive() -> StatusCode {
    record_http_request("/alive");
    let _timer = http_request_timer("/alive");

    StatusCode::OK
}

/// This is the handler for the /metrics path
#[tracing::instrument]
async fn metrics() -> impl IntoResponse {
    record_http_request("/metrics");
    let _timer = http_request_timer("/metrics");

    match METRICS_HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Metrics recorder is not installed".to_string(),
        ),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TriggeredParams {
    fn to_query(&self) -> ListQuery {
        let mut query = ListQuery::for_type::<TriggeredAlert>();

        let direction = match self.desc {
            Some(true) => Direction::Descending,
            Some(false) => Direction::Ascending,
            None if self.sort.is_some() => Direction::Ascending,
            None => query.sort.direction,
        };
        let column = self
            .sort
            .as_deref()
            .filter(|column| TriggeredAlert::COLUMNS.iter().any(|known| known == column))
            .unwrap_or(&query.sort.column)
            .to_string();

        query.sort = SortState::new(column, direction);
        query.search = self.search.clone().unwrap_or_default();
        query.page = self.page.unwrap_or(1);
        query.page_size = self.page_size.unwrap_or(query.page_size);
        query
    }
}

/// This is the handler for the /triggered path
#[tracing::instrument(skip_all)]
async fn triggered(
    State(state): State<AppState>,
    Query(params): Query<TriggeredParams>,
) -> Json<Page<TriggeredAlert>> {
    record_http_request("/triggered");
    let _timer = http_request_timer("/triggered");

    let alerts = state.triggered.read().await;
    let page = listing::apply(alerts.as_slice(), &params.to_query());

    Json(Page {
        items: page.items.into_iter().cloned().collect(),
        page: page.page,
        total_pages: page.total_pages,
        total: page.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_most_recent_first() {
        let query = TriggeredParams::default().to_query();

        assert_eq!(query.sort, SortState::new("time", Direction::Descending));
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, listing::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn unknown_sort_column_falls_back_to_time() {
        let params = TriggeredParams {
            sort: Some("nope".into()),
            ..Default::default()
        };

        assert_eq!(params.to_query().sort.column, "time");
    }
}
