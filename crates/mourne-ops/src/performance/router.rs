use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{Board, Dimension};
use super::ingest::RawRecord;
use super::service::{LeaderboardRequest, PerformanceError, PerformanceService};
use super::source::{MetricSource, MetricTable};
use super::window::DateWindow;

/// Query string accepted by the leaderboard endpoint.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub board: Board,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub window: Option<DateWindow>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub components: bool,
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    #[serde(default)]
    pub window: Option<DateWindow>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Service plus the window used when a request names none.
pub struct PerformanceState<S> {
    pub service: PerformanceService<S>,
    pub default_window: DateWindow,
}

/// Router builder exposing leaderboard, dashboard, and submission endpoints.
pub fn performance_router<S>(state: Arc<PerformanceState<S>>) -> Router
where
    S: MetricSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/performance/leaderboard",
            get(leaderboard_handler::<S>),
        )
        .route("/api/v1/performance/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/performance/shifts", post(submit_shift_handler::<S>))
        .route("/api/v1/performance/audits", post(submit_audit_handler::<S>))
        .with_state(state)
}

pub(crate) async fn leaderboard_handler<S>(
    State(state): State<Arc<PerformanceState<S>>>,
    Query(params): Query<LeaderboardParams>,
) -> Response
where
    S: MetricSource + 'static,
{
    let request = LeaderboardRequest {
        board: params.board,
        dimension: params.dimension.unwrap_or(Dimension::Store),
        window: params.window.unwrap_or(state.default_window),
        today: params.today.unwrap_or_else(|| Local::now().date_naive()),
        store: params.store,
        include_components: params.components,
    };

    on_blocking_pool(state, move |service| match service.leaderboard(&request) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    })
    .await
}

pub(crate) async fn dashboard_handler<S>(
    State(state): State<Arc<PerformanceState<S>>>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    S: MetricSource + 'static,
{
    let window = params.window.unwrap_or(state.default_window);
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());

    on_blocking_pool(state, move |service| match service.dashboard(window, today) {
        Ok(report) => (StatusCode::OK, axum::Json(report.summary())).into_response(),
        Err(error) => error_response(error),
    })
    .await
}

pub(crate) async fn submit_shift_handler<S>(
    State(state): State<Arc<PerformanceState<S>>>,
    axum::Json(row): axum::Json<RawRecord>,
) -> Response
where
    S: MetricSource + 'static,
{
    on_blocking_pool(state, move |service| {
        submit(service, MetricTable::ShiftMetrics, row)
    })
    .await
}

pub(crate) async fn submit_audit_handler<S>(
    State(state): State<Arc<PerformanceState<S>>>,
    axum::Json(row): axum::Json<RawRecord>,
) -> Response
where
    S: MetricSource + 'static,
{
    on_blocking_pool(state, move |service| {
        submit(service, MetricTable::OsaAudits, row)
    })
    .await
}

/// Source calls block, so service work runs off the async workers.
async fn on_blocking_pool<S, F>(state: Arc<PerformanceState<S>>, work: F) -> Response
where
    S: MetricSource + 'static,
    F: FnOnce(&PerformanceService<S>) -> Response + Send + 'static,
{
    match tokio::task::spawn_blocking(move || work(&state.service)).await {
        Ok(response) => response,
        Err(error) => {
            error!(%error, "performance worker did not complete");
            let payload = json!({ "error": "performance worker did not complete" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn submit<S>(service: &PerformanceService<S>, table: MetricTable, row: RawRecord) -> Response
where
    S: MetricSource + 'static,
{
    match service.submit(table, row) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PerformanceError) -> Response {
    let status = match &error {
        PerformanceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PerformanceError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
