//! Common test setup functions.

use api::{router, AppState, DashboardSettings};
use axum::Router;
use axum_test::TestServer;
use event_source::EventSource;
use serde_json::Value;
use std::sync::Arc;

use crate::mocks::MockSource;

/// Test context wiring a mock source into the real router.
///
/// Requests go through the same extractors, dataset cache and loader as in
/// production; only the source is swapped.
pub struct TestContext {
    pub source: Arc<MockSource>,
    pub state: AppState,
    pub router: Router,
}

impl TestContext {
    /// Context serving `records` with default settings.
    pub fn with_records(records: Vec<Value>) -> Self {
        Self::from_source(MockSource::new(records), DashboardSettings::default())
    }

    /// Context whose source always fails.
    pub fn failing() -> Self {
        Self::from_source(MockSource::failing(), DashboardSettings::default())
    }

    pub fn from_source(source: MockSource, settings: DashboardSettings) -> Self {
        let source = Arc::new(source);
        let state = AppState::new(source.clone() as Arc<dyn EventSource>, settings);
        let router = router(state.clone());

        Self {
            source,
            state,
            router,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}
