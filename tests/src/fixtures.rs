//! Test fixtures and event generators.
//!
//! The engagement dataset spans January and February 2024 plus one row from
//! June 2023. Column names deliberately mix case and use alias columns.

use serde_json::{json, Value};

/// Window covering every 2024 fixture row.
pub const START: &str = "2024-01-01";
pub const END: &str = "2024-02-29";

fn record(
    event_type: &str,
    date: &str,
    user: &str,
    browser: &str,
    destination: Option<&str>,
) -> Value {
    json!({
        "Event_Type": event_type,
        "EVENT_DATE": date,
        "user_ID": user,
        "Browser": browser,
        "Program_Destination": destination,
        "member_state": "KS",
    })
}

/// Typed engagement events.
///
/// In the 2024 window: 4 crossovers (users u1, u2, u1, u3), 3 link clicks
/// (u1 to Kansas in January, u3 and u2 to Virta in February) and 1 signup.
pub fn engagement_records() -> Vec<Value> {
    vec![
        record("IN_BOUND_CROSSOVER", "2024-01-05", "u1", "Chrome", None),
        record("IN_BOUND_CROSSOVER", "2024-01-20", "u2", "Safari", None),
        record("in_bound_crossover", "2024-01-21", "u1", "Chrome", None),
        record("CARE_PROGRAM_CLICKED", "2024-01-22", "u1", "Chrome", Some("Kansas")),
        record("IN_BOUND_CROSSOVER", "2024-02-03", "u3", "Chrome", None),
        record("CARE_PROGRAM_CLICKED", "2024-02-10", "u3", "Chrome", Some("Virta")),
        record("CARE_PROGRAM_CLICKED", "2024-02-11", "u2", "Safari", Some("Virta")),
        record("signup", "2024-02-12", "u3", "Chrome", None),
        record("IN_BOUND_CROSSOVER", "2023-06-01", "u9", "Edge", None),
    ]
}

/// `n` rows with no event type and no traffic source, all in March 2024.
pub fn untyped_records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "event_date": format!("2024-03-{:02}", i % 28 + 1),
                "browser": "Chrome",
            })
        })
        .collect()
}
