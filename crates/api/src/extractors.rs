//! Request extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{Local, NaiveDate};
use dashboard_core::{DateRange, Dimension, DimensionFilter, Granularity};
use serde::Deserialize;

use crate::response::ApiError;
use crate::state::AppState;

/// Raw query-string parameters accepted by the dashboard endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    /// Shorthand for `dimension=browser&value=...`.
    pub browser: Option<String>,
    pub dimension: Option<String>,
    pub value: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub granularity: Option<String>,
    pub top: Option<usize>,
}

impl ViewParams {
    /// Resolves the parameters against `default_window`.
    ///
    /// Unknown dimensions and granularities are rejected. Dates never are:
    /// a partial or unreadable window falls back to the default.
    pub fn resolve(&self, default_window: DateRange) -> Result<ViewQuery, ApiError> {
        let filter = match self.dimension.as_deref() {
            Some(dimension) => {
                DimensionFilter::new(dimension.parse::<Dimension>()?, self.value.as_deref())
            }
            None => DimensionFilter::new(Dimension::Browser, self.browser.as_deref()),
        };

        let granularity = match self.granularity.as_deref() {
            Some(g) => g.parse::<Granularity>()?,
            None => Granularity::default(),
        };

        Ok(ViewQuery {
            filter,
            window: DateRange::resolve(self.start.as_deref(), self.end.as_deref(), default_window),
            granularity,
            top: self.top,
        })
    }
}

/// Resolved filter, window and shaping options for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    pub filter: DimensionFilter,
    pub window: DateRange,
    pub granularity: Granularity,
    pub top: Option<usize>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[async_trait]
impl FromRequestParts<AppState> for ViewQuery {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ViewParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        params.resolve(state.settings.default_window(today()))
    }
}
