//! HTTP query API for the engagement dashboard.

pub mod extractors;
pub mod response;
pub mod routes;
pub mod settings;
pub mod state;
pub mod theme;

pub use routes::router;
pub use settings::{DashboardSettings, FilterSettings};
pub use state::{AppState, DatasetCache};
pub use theme::Theme;
