//! Core types, normalization, filtering and aggregation for the engagement dashboard.

pub mod aggregate;
pub mod coerce;
pub mod enrich;
pub mod error;
pub mod events;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod raw;
pub mod schema;

pub use aggregate::*;
pub use enrich::Enricher;
pub use error::{Error, IngestErrorCode, Result};
pub use events::*;
pub use filter::*;
pub use normalize::Normalizer;
pub use pipeline::Pipeline;
pub use raw::RawTable;
