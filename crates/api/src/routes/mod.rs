//! API routes.

pub mod dashboard;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/filters/:dimension", get(dashboard::filter_options_handler))
        .route("/kpis", get(dashboard::kpis_handler))
        .route("/trend/conversion", get(dashboard::conversion_trend_handler))
        .route("/crossovers/trend", get(dashboard::crossover_trend_handler))
        .route("/crossovers/by-browser", get(dashboard::crossovers_by_browser_handler))
        .route("/link-clicks/trend", get(dashboard::link_click_trend_handler))
        .route(
            "/link-clicks/by-destination",
            get(dashboard::link_clicks_by_destination_handler),
        )
        .route("/theme", get(dashboard::theme_handler))
        .route("/refresh", post(dashboard::refresh_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
