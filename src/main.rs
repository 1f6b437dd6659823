//! Engagement Dashboard Backend
//!
//! Serves member-engagement analytics over HTTP:
//! - Loads events from an HTTP endpoint or a delimited file
//! - Normalizes them onto one canonical schema and enriches them
//! - Answers filtered KPI, trend and breakdown queries from a cached table

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use validator::Validate;

use api::{router, AppState, DashboardSettings, FilterSettings};
use dashboard_core::HeuristicRates;
use event_source::SourceConfig;
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Validate)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    source: SourceConfig,

    #[validate(nested)]
    #[serde(default)]
    filters: FilterSettings,

    /// Fallback funnel rates for data without event types
    #[validate(nested)]
    #[serde(default)]
    heuristics: HeuristicRates,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            source: SourceConfig::default(),
            filters: FilterSettings::default(),
            heuristics: HeuristicRates::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Engagement Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        kind = ?config.source.kind,
        window_months = config.filters.default_window_months,
        "Loaded configuration"
    );

    let source = config
        .source
        .build()
        .context("Failed to create event source")?;

    let state = AppState::new(
        source,
        DashboardSettings {
            filters: config.filters.clone(),
            heuristics: config.heuristics,
        },
    );

    // Warm the dataset cache; an empty result is served as "no data", not fatal
    let outcome = state.dataset.get().await;
    if outcome.has_data() {
        info!(rows = outcome.rows, source = %outcome.source, "Dataset ready");
    } else {
        warn!(reason = %outcome.no_data_reason(), "Starting without data");
    }

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables, e.g. DASHBOARD__SOURCE__KIND=file
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("DASHBOARD")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat overrides for the values most often set per deployment
    if let Ok(url) = std::env::var("DASHBOARD_EVENTS_URL") {
        config.source.url = url;
    }
    if let Ok(path) = std::env::var("DASHBOARD_EVENTS_FILE") {
        config.source.path = path;
    }

    config
        .validate()
        .context("Invalid configuration")?;

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
