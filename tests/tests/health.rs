//! Tests for health check endpoints.
//!
//! These tests verify the health endpoints return correct status and structure.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::with_records(fixtures::engagement_records());
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();

    assert!(body.get("status").is_some(), "Response should have 'status' field");
    assert!(body.get("metrics").is_some(), "Response should have 'metrics' field");

    let names: Vec<&str> = body["components"]
        .as_array()
        .map(|c| c.iter().filter_map(|c| c["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["data_source", "dataset"]);
}

/// Test /health endpoint reports valid status
#[tokio::test]
async fn test_health_endpoint_status_value() {
    let ctx = TestContext::with_records(fixtures::engagement_records());
    let server = ctx.server();

    let body: Value = server.get("/health").await.json();

    let status = body["status"].as_str().unwrap_or("");
    assert!(
        status == "healthy" || status == "degraded" || status == "unhealthy",
        "Status should be 'healthy', 'degraded', or 'unhealthy', got '{}'",
        status
    );
}

/// Test readiness after a successful load
#[tokio::test]
async fn test_ready_after_load() {
    let ctx = TestContext::with_records(fixtures::engagement_records());
    let server = ctx.server();

    // Loading happens lazily on the first query
    ctx.state.dataset.get().await;

    server.get("/health/ready").await.assert_status_ok();
}

/// Test /health/live always returns 200
#[tokio::test]
async fn test_live_endpoint() {
    let ctx = TestContext::with_records(Vec::new());
    let server = ctx.server();

    let response = server.get("/health/live").await;
    response.assert_status(StatusCode::OK);
}

/// Test /metrics counts loads and queries
#[tokio::test]
async fn test_metrics_endpoint_counts_queries() {
    let ctx = TestContext::with_records(fixtures::engagement_records());
    let server = ctx.server();

    server
        .get("/api/kpis")
        .add_query_param("start", fixtures::START)
        .add_query_param("end", fixtures::END)
        .await
        .assert_status_ok();

    let body: Value = server.get("/metrics").await.json();
    assert!(body["dataset_loads"].as_u64().unwrap_or(0) >= 1);
    assert!(body["queries_served"].as_u64().unwrap_or(0) >= 1);
}
