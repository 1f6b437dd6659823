//! Event data sources for the engagement dashboard.
//!
//! Both sources produce the same [`RawTable`](dashboard_core::RawTable);
//! everything downstream of the loader is source-agnostic.

pub mod config;
pub mod delimited;
pub mod http;
pub mod loader;

use async_trait::async_trait;
use dashboard_core::{RawTable, Result};

pub use config::*;
pub use delimited::DelimitedFileSource;
pub use http::HttpEventSource;
pub use loader::*;

/// A row-oriented source of raw event records.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetches every record the source currently holds.
    async fn fetch(&self) -> Result<RawTable>;

    /// Human-readable location, for logs and error messages.
    fn describe(&self) -> String;
}
