//! One-shot dataset load: fetch, normalize, enrich.
//!
//! A load never fails. Source errors produce an empty table together with
//! the error text, so the API can answer "no data" with a reason.

use chrono::{DateTime, Utc};
use dashboard_core::{EventTable, Pipeline};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use telemetry::{health, metrics};
use tracing::{info, warn};

use crate::EventSource;

/// Result of loading the event table from a source.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    #[serde(skip)]
    pub table: Arc<EventTable>,
    pub rows: usize,
    pub error: Option<String>,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadOutcome {
    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    /// Reason to report when the table is empty.
    pub fn no_data_reason(&self) -> String {
        match &self.error {
            Some(err) => format!("failed to load events from {}: {}", self.source, err),
            None => format!("no events available from {}", self.source),
        }
    }
}

/// Fetches raw records from `source` and runs them through `pipeline`.
pub async fn load_event_table(source: &dyn EventSource, pipeline: &Pipeline) -> LoadOutcome {
    let started = Instant::now();
    let location = source.describe();
    metrics().dataset_loads.inc();

    let (table, error) = match source.fetch().await {
        Ok(raw) => {
            health().data_source.set_healthy();
            (pipeline.process(&raw), None)
        }
        Err(e) => {
            warn!(source = %location, code = e.error_code(), error = %e, "event load failed");
            metrics().dataset_load_failures.inc();
            health().data_source.set_unhealthy(e.to_string());
            (EventTable::empty(), Some(e.to_string()))
        }
    };

    let rows = table.len();
    let elapsed = started.elapsed().as_millis() as u64;
    metrics().rows_loaded.set(rows as u64);
    metrics().load_latency_ms.observe(elapsed);

    if rows > 0 {
        health().dataset.set_healthy();
    } else {
        health().dataset.set_unhealthy("event table is empty");
    }
    info!(source = %location, rows, elapsed_ms = elapsed, "event table loaded");

    LoadOutcome {
        table: Arc::new(table),
        rows,
        error,
        source: location,
        loaded_at: Utc::now(),
    }
}
