//! Render theme handed to the front end.
//!
//! The dashboard's look is fixed; clients fetch it once from `/api/theme`
//! instead of hard-coding colors.

use serde::{Deserialize, Serialize};

/// Named brand colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub light_blue: String,
    pub danger: String,
    pub bg_soft: String,
    pub border: String,
    pub ink: String,
    pub ok: String,
    pub link_blue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub palette: Palette,
    /// Categorical series colors, darkest first.
    pub series: Vec<String>,
    pub font_family: String,
    pub chart_title_size: u32,
    /// Shared by charts rendered side by side.
    pub plot_height: u32,
}

impl Theme {
    pub fn brand() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            palette: Palette {
                primary: hex("#436DB3"),
                light_blue: hex("#BFD0EE"),
                danger: hex("#F4454E"),
                bg_soft: hex("#F7F3EF"),
                border: hex("#EDEDED"),
                ink: hex("#0B1221"),
                ok: hex("#1A8E3B"),
                link_blue: hex("#0071BC"),
            },
            series: ["#436DB3", "#5B84C7", "#87A9DA", "#AFC5E8", "#D3E1F5"]
                .into_iter()
                .map(hex)
                .collect(),
            font_family: "Roboto".to_string(),
            chart_title_size: 18,
            plot_height: 380,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::brand()
    }
}
