//! Mock implementations for testing.

use async_trait::async_trait;
use dashboard_core::{Error, IngestErrorCode, RawTable, Result};
use event_source::EventSource;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// In-memory event source.
///
/// Implements the same `EventSource` trait as the HTTP and file sources,
/// so tests drive the real loader, cache and router.
#[derive(Clone)]
pub struct MockSource {
    /// Records returned by `fetch`.
    records: Arc<Mutex<Vec<Value>>>,
    /// Simulate an unreachable source if set.
    should_fail: Arc<Mutex<bool>>,
    fetches: Arc<Mutex<usize>>,
}

impl MockSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            should_fail: Arc::new(Mutex::new(false)),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// A source whose every fetch fails.
    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_should_fail(true);
        source
    }

    /// Replace the records served by later fetches.
    pub fn set_records(&self, records: Vec<Value>) {
        *self.records.lock() = records;
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// How many times `fetch` was called.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn fetch(&self) -> Result<RawTable> {
        *self.fetches.lock() += 1;
        if *self.should_fail.lock() {
            return Err(Error::ingestion(
                IngestErrorCode::Unreachable,
                "mock source unreachable",
            ));
        }
        RawTable::from_records(self.records.lock().clone())
    }

    fn describe(&self) -> String {
        "mock://events".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_source_serves_records() {
        let mock = MockSource::new(vec![json!({"event_type": "crossover"})]);

        let raw = mock.fetch().await.unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(mock.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_source_failure_mode() {
        let mock = MockSource::failing();

        let err = mock.fetch().await.unwrap_err();
        assert_eq!(err.error_code(), "INGEST_001");
    }
}
