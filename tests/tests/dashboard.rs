//! End-to-end tests for the dashboard query endpoints.

use api::response::{OptionsResponse, QueryResponse, RefreshResponse};
use axum::http::StatusCode;
use axum_test::{TestRequest, TestServer};
use dashboard_core::{
    CategoryCount, ConversionPoint, DestinationPivot, Exactness, MetricSnapshot, PeriodCount,
};
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

fn in_window(server: &TestServer, path: &str) -> TestRequest {
    server
        .get(path)
        .add_query_param("start", fixtures::START)
        .add_query_param("end", fixtures::END)
}

fn engagement() -> TestServer {
    TestContext::with_records(fixtures::engagement_records()).server()
}

/// Exact funnel counts over the 2024 window
#[tokio::test]
async fn test_kpis_exact_counts() {
    let server = engagement();

    let response = in_window(&server, "/api/kpis").await;
    response.assert_status_ok();

    let body: QueryResponse<MetricSnapshot> = response.json();
    assert_eq!(body.rows, 8);
    assert_eq!(body.data.counts.exactness, Exactness::Exact);
    assert_eq!(body.data.counts.crossover, 4);
    assert_eq!(body.data.counts.link_click, 3);
    assert_eq!(body.data.counts.signup, 1);
    assert_eq!(body.data.counts.improvement, 0);
    assert!((body.data.conversion_rate - 75.0).abs() < 1e-9);
}

/// Browser filter narrows the funnel
#[tokio::test]
async fn test_kpis_browser_filter() {
    let server = engagement();

    let response = in_window(&server, "/api/kpis")
        .add_query_param("browser", "Chrome")
        .await;
    response.assert_status_ok();

    let body: QueryResponse<MetricSnapshot> = response.json();
    assert_eq!(body.rows, 6);
    assert_eq!(body.data.counts.crossover, 3);
    assert_eq!(body.data.counts.link_click, 2);
}

/// "All" is the same as no filter
#[tokio::test]
async fn test_kpis_all_matches_unfiltered() {
    let server = engagement();

    let all: QueryResponse<MetricSnapshot> = in_window(&server, "/api/kpis")
        .add_query_param("browser", "All")
        .await
        .json();
    let unfiltered: QueryResponse<MetricSnapshot> = in_window(&server, "/api/kpis").await.json();

    assert_eq!(all.rows, unfiltered.rows);
    assert_eq!(all.data, unfiltered.data);
}

/// Generic dimension filter on a coalesced column
#[tokio::test]
async fn test_kpis_state_filter_uses_coalesced_column() {
    let server = engagement();

    let body: QueryResponse<MetricSnapshot> = in_window(&server, "/api/kpis")
        .add_query_param("dimension", "state")
        .add_query_param("value", "KS")
        .await
        .json();
    assert_eq!(body.rows, 8);

    let body: QueryResponse<MetricSnapshot> = in_window(&server, "/api/kpis")
        .add_query_param("dimension", "state")
        .add_query_param("value", "MO")
        .await
        .json();
    assert_eq!(body.rows, 0);
    assert_eq!(body.data.conversion_rate, 0.0);
}

/// Heuristic counts when no event types exist
#[tokio::test]
async fn test_kpis_estimated_without_event_types() {
    let server = TestContext::with_records(fixtures::untyped_records(10)).server();

    let body: QueryResponse<MetricSnapshot> = server
        .get("/api/kpis")
        .add_query_param("start", "2024-03-01")
        .add_query_param("end", "2024-03-31")
        .await
        .json();

    assert_eq!(body.data.counts.exactness, Exactness::Estimated);
    assert_eq!(body.data.counts.crossover, 10);
    assert_eq!(body.data.counts.link_click, 3);
    assert_eq!(body.data.counts.signup, 0);
}

/// Unique crossovers per month and per day
#[tokio::test]
async fn test_crossover_trend() {
    let server = engagement();

    let monthly: QueryResponse<Vec<PeriodCount>> =
        in_window(&server, "/api/crossovers/trend").await.json();
    let counts: Vec<(String, u64)> = monthly
        .data
        .iter()
        .map(|p| (p.period.to_string(), p.unique_ids))
        .collect();
    assert_eq!(
        counts,
        vec![("2024-01-01".to_string(), 2), ("2024-02-01".to_string(), 1)]
    );

    let daily: QueryResponse<Vec<PeriodCount>> = in_window(&server, "/api/crossovers/trend")
        .add_query_param("granularity", "day")
        .await
        .json();
    assert_eq!(daily.data.len(), 4);
    assert!(daily.data.iter().all(|p| p.unique_ids == 1));
}

/// Conversion trend joins crossovers and clicks per period
#[tokio::test]
async fn test_conversion_trend() {
    let server = engagement();

    let body: QueryResponse<Vec<ConversionPoint>> =
        in_window(&server, "/api/trend/conversion").await.json();

    assert_eq!(body.data.len(), 2);
    assert_eq!(body.data[0].crossovers, 2);
    assert_eq!(body.data[0].link_clicks, 1);
    assert!((body.data[0].conversion_rate - 50.0).abs() < 1e-9);
    assert_eq!(body.data[1].crossovers, 1);
    assert_eq!(body.data[1].link_clicks, 2);
}

/// Crossovers by browser, largest first
#[tokio::test]
async fn test_crossovers_by_browser() {
    let server = engagement();

    let body: QueryResponse<Vec<CategoryCount>> =
        in_window(&server, "/api/crossovers/by-browser").await.json();
    let rows: Vec<(&str, u64)> = body
        .data
        .iter()
        .map(|c| (c.category.as_str(), c.unique_ids))
        .collect();
    assert_eq!(rows, vec![("Chrome", 2), ("Safari", 1)]);

    let top: QueryResponse<Vec<CategoryCount>> = in_window(&server, "/api/crossovers/by-browser")
        .add_query_param("top", "1")
        .await
        .json();
    assert_eq!(top.data.len(), 1);
    assert_eq!(top.data[0].category, "Chrome");
}

/// Link-click pivot always carries Kansas and Virta
#[tokio::test]
async fn test_link_click_trend_pivot() {
    let server = engagement();

    let response = in_window(&server, "/api/link-clicks/trend").await;
    response.assert_status_ok();

    let body: QueryResponse<DestinationPivot> = response.json();
    assert_eq!(body.data.destinations, vec!["Kansas", "Virta"]);
    assert_eq!(body.data.rows.len(), 2);
    assert_eq!(body.data.rows[0].get("Kansas"), 1);
    assert_eq!(body.data.rows[0].get("Virta"), 0);
    assert_eq!(body.data.rows[1].get("Kansas"), 0);
    assert_eq!(body.data.rows[1].get("Virta"), 2);

    // Pivot columns are flattened into each row
    let raw: Value = in_window(&server, "/api/link-clicks/trend").await.json();
    assert_eq!(raw["data"]["rows"][0]["period"], "2024-01-01");
    assert_eq!(raw["data"]["rows"][0]["Kansas"], 1);
}

/// Required pivot columns appear even with no clicks
#[tokio::test]
async fn test_link_click_trend_required_columns_without_clicks() {
    let server = engagement();

    let body: QueryResponse<DestinationPivot> = in_window(&server, "/api/link-clicks/trend")
        .add_query_param("browser", "Edge")
        .await
        .json();
    assert_eq!(body.data.destinations, vec!["Kansas", "Virta"]);
    assert!(body.data.rows.is_empty());
}

/// Link clicks by destination
#[tokio::test]
async fn test_link_clicks_by_destination() {
    let server = engagement();

    let body: QueryResponse<Vec<CategoryCount>> =
        in_window(&server, "/api/link-clicks/by-destination").await.json();
    let rows: Vec<(&str, u64)> = body
        .data
        .iter()
        .map(|c| (c.category.as_str(), c.unique_ids))
        .collect();
    assert_eq!(rows, vec![("Virta", 2), ("Kansas", 1)]);
}

/// Partial window input falls back to the default window
#[tokio::test]
async fn test_partial_window_uses_default() {
    let server = engagement();

    let partial: QueryResponse<MetricSnapshot> = server
        .get("/api/kpis")
        .add_query_param("start", fixtures::START)
        .await
        .json();
    let default: QueryResponse<MetricSnapshot> = server.get("/api/kpis").await.json();

    assert_eq!(partial.window, default.window);
}

/// Selector options ignore the date window
#[tokio::test]
async fn test_filter_options() {
    let server = engagement();

    let response = server.get("/api/filters/browser").await;
    response.assert_status_ok();
    let body: OptionsResponse = response.json();
    assert_eq!(body.options, vec!["All", "Chrome", "Edge", "Safari"]);

    let body: OptionsResponse = server.get("/api/filters/program_destination").await.json();
    assert_eq!(body.options, vec!["All", "Kansas", "Virta"]);
}

/// Unknown dimension or granularity is a 400
#[tokio::test]
async fn test_invalid_parameters_return_400() {
    let server = engagement();

    let response = server.get("/api/filters/shoe_size").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALID_001");

    let response = server
        .get("/api/crossovers/trend")
        .add_query_param("granularity", "fortnight")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Theme carries the brand palette
#[tokio::test]
async fn test_theme() {
    let server = engagement();

    let response = server.get("/api/theme").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["palette"]["primary"], "#436DB3");
    assert_eq!(body["plot_height"], 380);
    assert_eq!(body["series"].as_array().map(Vec::len), Some(5));
}

/// Dataset is fetched once and reloaded on refresh
#[tokio::test]
async fn test_refresh_reloads_dataset() {
    let ctx = TestContext::with_records(fixtures::engagement_records());
    let server = ctx.server();

    in_window(&server, "/api/kpis").await.assert_status_ok();
    in_window(&server, "/api/crossovers/trend").await.assert_status_ok();
    assert_eq!(ctx.source.fetch_count(), 1);

    ctx.source.set_records(fixtures::untyped_records(5));
    let response = server.post("/api/refresh").await;
    response.assert_status_ok();
    let body: RefreshResponse = response.json();
    assert_eq!(body.rows, 5);
    assert!(body.error.is_none());
    assert_eq!(ctx.source.fetch_count(), 2);

    let kpis: QueryResponse<MetricSnapshot> = server
        .get("/api/kpis")
        .add_query_param("start", "2024-03-01")
        .add_query_param("end", "2024-03-31")
        .await
        .json();
    assert_eq!(kpis.data.counts.exactness, Exactness::Estimated);
}
