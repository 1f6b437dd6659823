//! Tests for the terminal "no data" state.
//!
//! Every source here fails or is empty, so the shared dataset health stays
//! unhealthy for the whole test binary.

use axum::http::StatusCode;
use integration_tests::{fixtures, mocks::MockSource, setup::TestContext};
use api::DashboardSettings;
use serde_json::Value;

/// Failed load answers 503 DATA_001 with the load error
#[tokio::test]
async fn test_failed_source_returns_no_data() {
    let ctx = TestContext::failing();
    let server = ctx.server();

    let response = server.get("/api/kpis").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["code"], "DATA_001");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("mock source unreachable"), "got {message}");
}

/// Every query endpoint shares the no-data answer
#[tokio::test]
async fn test_all_query_endpoints_return_no_data() {
    let ctx = TestContext::failing();
    let server = ctx.server();

    for path in [
        "/api/filters/browser",
        "/api/trend/conversion",
        "/api/crossovers/trend",
        "/api/crossovers/by-browser",
        "/api/link-clicks/trend",
        "/api/link-clicks/by-destination",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["code"], "DATA_001", "path {path}");
    }
}

/// Failed load is cached rather than retried per request
#[tokio::test]
async fn test_failed_load_is_cached() {
    let ctx = TestContext::failing();
    let server = ctx.server();

    server.get("/api/kpis").await;
    server.get("/api/crossovers/trend").await;

    assert_eq!(ctx.source.fetch_count(), 1);
}

/// An empty source is also the no-data state, without an error
#[tokio::test]
async fn test_empty_source_returns_no_data() {
    let ctx = TestContext::from_source(MockSource::new(Vec::new()), DashboardSettings::default());
    let server = ctx.server();

    let response = server.get("/api/kpis").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "no events available from mock://events");
}

/// Refresh reports the error and recovers once the source does
#[tokio::test]
async fn test_refresh_recovers_after_source_failure() {
    let ctx = TestContext::failing();
    let server = ctx.server();

    let response = server.post("/api/refresh").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["rows"], 0);
    assert!(body["error"].as_str().is_some());

    ctx.source.set_should_fail(false);
    ctx.source.set_records(fixtures::engagement_records());

    // Still cached as failed until refreshed
    server
        .get("/api/kpis")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = server.post("/api/refresh").await.json();
    assert_eq!(body["rows"], 9);
    assert!(body["error"].is_null());

    server
        .get("/api/kpis")
        .add_query_param("start", fixtures::START)
        .add_query_param("end", fixtures::END)
        .await
        .assert_status_ok();
}
