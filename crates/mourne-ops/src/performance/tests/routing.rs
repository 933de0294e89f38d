use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::performance::ingest::RawRecord;
use crate::performance::source::{MetricQuery, MetricSource, MetricTable, SourceError};
use crate::performance::PerformanceService;

/// Reads work; any write takes the worker down.
struct CrashingWriteSource;

impl MetricSource for CrashingWriteSource {
    fn query(
        &self,
        _table: MetricTable,
        _query: &MetricQuery,
    ) -> Result<Vec<RawRecord>, SourceError> {
        Ok(Vec::new())
    }

    fn insert(&self, table: MetricTable, _row: RawRecord) -> Result<(), SourceError> {
        panic!("{} writer crashed", table.name());
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn leaderboard_endpoint_returns_ranked_entries() {
    let app = router_for(build_service(seeded_source()));

    let response = app
        .oneshot(get(
            "/api/v1/performance/leaderboard?board=osa&window=mtd&today=2025-03-18",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["board"], "osa");
    assert_eq!(body["board_label"], "OSA Standards");
    assert_eq!(body["dimension"], "store");
    assert_eq!(body["entries"][0]["key"], "Downpatrick");
    assert_eq!(body["entries"][0]["position"], 1);
    assert_eq!(body["entries"][0]["points_lost"], 4.0);
    assert_eq!(body["entries"][1]["key"], "Kilkeel");
    assert!(body["entries"][0].get("components").is_none());
}

#[tokio::test]
async fn leaderboard_endpoint_honours_store_and_components() {
    let app = router_for(build_service(seeded_source()));

    let response = app
        .oneshot(get(
            "/api/v1/performance/leaderboard?board=cost&store=Kilkeel&window=all&today=2025-03-18&components=true",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let entries = body["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["count"], 3);
    assert!(entries[0]["components"]
        .as_array()
        .map(|components| !components.is_empty())
        .unwrap_or(false));
}

#[tokio::test]
async fn leaderboard_endpoint_accepts_oversized_rolling_window() {
    let app = router_for(build_service(seeded_source()));

    let response = app
        .oneshot(get(
            "/api/v1/performance/leaderboard?board=cost&window=last100000000&today=2025-03-18",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let kilkeel = body["entries"]
        .as_array()
        .expect("entries array")
        .iter()
        .find(|entry| entry["key"] == "Kilkeel")
        .cloned()
        .expect("kilkeel ranked");
    assert_eq!(kilkeel["count"], 3);
}

#[tokio::test]
async fn leaderboard_endpoint_rejects_unknown_board() {
    let app = router_for(build_service(seeded_source()));

    let response = app
        .oneshot(get("/api/v1/performance/leaderboard?board=speed"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_endpoint_reports_all_boards() {
    let app = router_for(build_service(seeded_source()));

    let response = app
        .oneshot(get("/api/v1/performance/dashboard?today=2025-03-18"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["window"]["window"], "mtd");
    assert_eq!(body["window"]["from"], "2025-03-01");
    assert_eq!(body["window"]["to"], "2025-03-19");
    assert_eq!(body["records"], 7);

    let boards: Vec<_> = body["store_boards"]
        .as_array()
        .expect("boards")
        .iter()
        .map(|board| board["board"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(boards, vec!["mpi", "service", "cost", "osa"]);
    assert_eq!(body["manager_board"]["dimension"], "manager");
    assert_eq!(body["insights"]["stores_without_data"], json!(["Ballynahinch"]));
}

#[tokio::test]
async fn shift_submission_is_created() {
    let source = seeded_source();
    let app = router_for(build_service(source.clone()));

    let response = app
        .oneshot(post_json(
            "/api/v1/performance/shifts",
            json!({
                "store": "Newcastle",
                "shift_date": "2025-03-18",
                "sales_gbp": 3900,
                "dot_pct": 81,
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["store"], "Newcastle");
    assert_eq!(body["dot"], 0.81);
    assert_eq!(source.rows(MetricTable::ShiftMetrics).len(), 7);
}

#[tokio::test]
async fn audit_submission_for_unknown_store_is_unprocessable() {
    let source = seeded_source();
    let app = router_for(build_service(source.clone()));

    let response = app
        .oneshot(post_json(
            "/api/v1/performance/audits",
            json!({ "store": "Lisburn", "date": "2025-03-18", "stars": 4 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "unknown store 'Lisburn'");
    assert_eq!(source.rows(MetricTable::OsaAudits).len(), 2);
}

#[tokio::test]
async fn source_outage_maps_to_bad_gateway() {
    let app = router_for(PerformanceService::new(Arc::new(AuditOutageSource), stores()));

    let response = app
        .oneshot(get("/api/v1/performance/dashboard?today=2025-03-18"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "osa_audits query failed: permission denied"
    );
}

#[tokio::test]
async fn crashed_worker_maps_to_internal_error() {
    let app = router_for(PerformanceService::new(Arc::new(CrashingWriteSource), stores()));

    let response = app
        .oneshot(post_json(
            "/api/v1/performance/shifts",
            json!({
                "store": "Kilkeel",
                "shift_date": "2025-03-18",
                "sales_gbp": 2000,
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "performance worker did not complete");
}
