//! Remote events API source.

use async_trait::async_trait;
use dashboard_core::{error::IngestErrorCode, Error, RawTable, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::EventSource;

/// Fetches `{"events": [...]}` from an HTTP endpoint.
#[derive(Clone)]
pub struct HttpEventSource {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpEventSource {
    /// Creates a source for the given endpoint.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::config(format!("invalid events URL {:?}: {}", url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { url, http_client })
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch(&self) -> Result<RawTable> {
        debug!(url = %self.url, "Fetching events");

        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Events request failed");
                Error::ingestion(
                    IngestErrorCode::Unreachable,
                    format!("events API unavailable: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Events API returned error");
            return Err(Error::ingestion(
                IngestErrorCode::BadStatus,
                format!("events API returned {}", status),
            ));
        }

        let payload: Value = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse events response");
            Error::parse(format!("invalid events response: {}", e))
        })?;

        parse_events_payload(payload)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads an events payload.
///
/// Supports:
/// 1. Object with events: `{ "events": [...] }`
/// 2. Bare array: `[record, record, ...]`
pub fn parse_events_payload(payload: Value) -> Result<RawTable> {
    match payload {
        Value::Object(mut obj) => match obj.remove("events") {
            Some(Value::Array(records)) => RawTable::from_records(records),
            Some(_) => Err(Error::parse("'events' must be an array")),
            None => Err(Error::parse("response has no 'events' array")),
        },
        Value::Array(records) => RawTable::from_records(records),
        _ => Err(Error::parse("response must be an object or an array")),
    }
}
