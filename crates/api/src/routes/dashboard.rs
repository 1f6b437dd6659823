//! Dashboard query endpoints.
//!
//! Every handler filters the shared table into a view and aggregates it.
//! Nothing here mutates the table, so requests never coordinate.

use axum::{
    extract::{Path, State},
    Json,
};
use dashboard_core::{
    breakdown, conversion_trend, destination_pivot, unique_by_period, CategoryCount,
    ConversionPoint, DestinationPivot, Dimension, Error, EventType, FilterEngine, FilteredView,
    MetricSnapshot, PeriodCount,
};
use event_source::LoadOutcome;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, warn};

use crate::extractors::ViewQuery;
use crate::response::{ApiError, OptionsResponse, QueryResponse, RefreshResponse};
use crate::state::AppState;
use crate::theme::Theme;

type QueryResult<T> = Result<Json<QueryResponse<T>>, ApiError>;

/// The cached dataset, or the no-data error when it is empty.
async fn loaded(state: &AppState) -> Result<Arc<LoadOutcome>, ApiError> {
    let outcome = state.dataset.get().await;
    if !outcome.has_data() {
        metrics().queries_without_data.inc();
        let reason = outcome.no_data_reason();
        warn!(reason = %reason, "query on empty dataset");
        return Err(Error::no_data(reason).into());
    }
    Ok(outcome)
}

/// Filters the dataset with `query` and runs `compute` over the view.
async fn run_query<T, F>(state: &AppState, query: &ViewQuery, compute: F) -> QueryResult<T>
where
    F: FnOnce(&FilteredView<'_>) -> T,
{
    let started = Instant::now();
    let outcome = loaded(state).await?;

    let engine = FilterEngine::new(&outcome.table);
    let view = engine.view(&query.filter, &query.window);
    let data = compute(&view);

    let elapsed = started.elapsed().as_millis() as u64;
    metrics().queries_served.inc();
    metrics().query_latency_ms.observe(elapsed);
    debug!(rows = view.len(), elapsed_ms = elapsed, "query served");

    Ok(Json(QueryResponse {
        filter: query.filter.clone(),
        window: query.window,
        rows: view.len(),
        data,
    }))
}

/// GET /api/filters/:dimension
pub async fn filter_options_handler(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let dimension: Dimension = dimension.parse()?;
    let outcome = loaded(&state).await?;
    let options = FilterEngine::new(&outcome.table).options(dimension);
    metrics().queries_served.inc();

    Ok(Json(OptionsResponse { dimension, options }))
}

/// GET /api/kpis
pub async fn kpis_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<MetricSnapshot> {
    let rates = state.settings.heuristics;
    run_query(&state, &query, |view| MetricSnapshot::from_view(view, &rates)).await
}

/// GET /api/trend/conversion
pub async fn conversion_trend_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<Vec<ConversionPoint>> {
    let granularity = query.granularity;
    run_query(&state, &query, |view| conversion_trend(view, granularity)).await
}

/// GET /api/crossovers/trend
pub async fn crossover_trend_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<Vec<PeriodCount>> {
    let granularity = query.granularity;
    run_query(&state, &query, |view| {
        unique_by_period(view, Some(&EventType::Crossover), granularity)
    })
    .await
}

/// GET /api/crossovers/by-browser
pub async fn crossovers_by_browser_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<Vec<CategoryCount>> {
    let top = query.top;
    run_query(&state, &query, |view| {
        breakdown(view, Dimension::Browser, Some(&EventType::Crossover), top)
    })
    .await
}

/// GET /api/link-clicks/trend
pub async fn link_click_trend_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<DestinationPivot> {
    let granularity = query.granularity;
    let required = state.settings.filters.required_destinations.clone();
    run_query(&state, &query, |view| {
        destination_pivot(view, Some(&EventType::LinkClick), granularity, &required)
    })
    .await
}

/// GET /api/link-clicks/by-destination
pub async fn link_clicks_by_destination_handler(
    State(state): State<AppState>,
    query: ViewQuery,
) -> QueryResult<Vec<CategoryCount>> {
    let top = query.top;
    run_query(&state, &query, |view| {
        breakdown(view, Dimension::ProgramDestination, Some(&EventType::LinkClick), top)
    })
    .await
}

/// GET /api/theme
pub async fn theme_handler(State(state): State<AppState>) -> Json<Theme> {
    Json(state.theme.as_ref().clone())
}

/// POST /api/refresh
pub async fn refresh_handler(State(state): State<AppState>) -> Json<RefreshResponse> {
    let outcome = state.dataset.refresh().await;
    Json(RefreshResponse::from(outcome.as_ref()))
}
