//! Record enrichment: derived fields on normalized events.
//!
//! - BMI from raw weight and height.
//! - Browser and device type from the user agent, when the source left them
//!   empty. Parsing uses woothee (~6.8us/parse).

use woothee::parser::Parser;

use crate::events::{CanonicalEvent, EventTable};

/// Body-mass index: weight / height².
///
/// Null when either input is missing, when height is zero, or when the
/// result is not finite.
pub fn bmi(weight: Option<f64>, height: Option<f64>) -> Option<f64> {
    let (weight, height) = (weight?, height?);
    if height == 0.0 {
        return None;
    }
    let value = weight / (height * height);
    value.is_finite().then_some(value)
}

/// Derives computed fields on canonical events.
pub struct Enricher {
    parser: Parser,
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Enrich a single event in place.
    ///
    /// Values already present on the event are never overwritten.
    pub fn enrich(&self, event: &mut CanonicalEvent) {
        event.bmi = bmi(event.weight, event.height);

        if event.browser.is_some() && event.device_type.is_some() {
            return;
        }
        let Some(user_agent) = event.user_agent.as_deref().filter(|ua| !ua.trim().is_empty())
        else {
            return;
        };

        if let Some(result) = self.parser.parse(user_agent) {
            if event.browser.is_none() && !result.name.is_empty() && result.name != "UNKNOWN" {
                event.browser = Some(result.name.to_string());
            }

            // woothee categories: pc, smartphone, mobilephone, crawler, appliance, misc
            if event.device_type.is_none() {
                let device_type = match result.category {
                    "pc" => Some("desktop"),
                    "smartphone" | "mobilephone" => Some("mobile"),
                    "crawler" => Some("bot"),
                    "appliance" => Some("other"),
                    _ => None,
                };
                event.device_type = device_type.map(str::to_string);
            }
        }
    }

    /// Enrich a whole table, returning the enriched copy.
    pub fn enrich_table(&self, table: EventTable) -> EventTable {
        table
            .into_events()
            .into_iter()
            .map(|mut event| {
                self.enrich(&mut event);
                event
            })
            .collect()
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}
