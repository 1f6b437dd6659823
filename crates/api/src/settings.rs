//! Query defaults shared by every dashboard endpoint.

use chrono::NaiveDate;
use dashboard_core::{DateRange, HeuristicRates};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Selector and window defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FilterSettings {
    /// Months covered by the date window when the request gives none.
    #[validate(range(min = 1, max = 120))]
    #[serde(default = "default_window_months")]
    pub default_window_months: u32,
    /// Destinations always present as link-click pivot columns.
    #[serde(default = "default_required_destinations")]
    pub required_destinations: Vec<String>,
}

fn default_window_months() -> u32 {
    12
}

fn default_required_destinations() -> Vec<String> {
    vec!["Kansas".to_string(), "Virta".to_string()]
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            default_window_months: default_window_months(),
            required_destinations: default_required_destinations(),
        }
    }
}

/// Everything a query handler needs besides the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DashboardSettings {
    #[validate(nested)]
    #[serde(default)]
    pub filters: FilterSettings,
    #[validate(nested)]
    #[serde(default)]
    pub heuristics: HeuristicRates,
}

impl DashboardSettings {
    pub fn default_window(&self, today: NaiveDate) -> DateRange {
        DateRange::last_months(today, self.filters.default_window_months)
    }
}
