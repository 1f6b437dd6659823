//! Internal telemetry for the engagement dashboard backend.
//!
//! Structured logging setup, in-process counters exposed over the API,
//! and a health registry for the data source and cached dataset.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
