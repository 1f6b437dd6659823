//! Canonical event model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::raw::RawTable;
use crate::schema::EVENT_SCHEMA;

/// Timestamp format used when rendering canonical rows back to raw values.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Event type after vocabulary normalization.
///
/// Unrecognized source values are kept as `Other`, lower-cased and trimmed.
/// A missing value is `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Crossover,
    LinkClick,
    Signup,
    Improvement,
    Other(String),
}

impl EventType {
    /// The funnel stages, in funnel order.
    pub const CANONICAL: [EventType; 4] = [
        EventType::Crossover,
        EventType::LinkClick,
        EventType::Signup,
        EventType::Improvement,
    ];

    /// Maps a raw source value onto the canonical vocabulary.
    ///
    /// Known aliases are matched on the trimmed, upper-cased value. Anything
    /// else passes through lower-cased.
    pub fn normalize(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or("");
        match trimmed.to_uppercase().as_str() {
            "IN_BOUND_CROSSOVER" => Self::Crossover,
            "CARE_PROGRAM_CLICKED" => Self::LinkClick,
            _ => Self::from_label(&trimmed.to_lowercase()),
        }
    }

    /// Reads an already lower-cased label.
    fn from_label(label: &str) -> Self {
        match label {
            "crossover" => Self::Crossover,
            "link_click" => Self::LinkClick,
            "signup" => Self::Signup,
            "improvement" => Self::Improvement,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Crossover => "crossover",
            Self::LinkClick => "link_click",
            Self::Signup => "signup",
            Self::Improvement => "improvement",
            Self::Other(label) => label,
        }
    }

    /// True for the four funnel stages.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        Self::normalize(Some(&value))
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical attribute an event can be filtered or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Browser,
    DeviceType,
    TrafficSource,
    UtmCampaign,
    Zipcode,
    RetentionStatus,
    ProgramActivity,
    ProgramDestination,
    State,
    City,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::Browser,
        Dimension::DeviceType,
        Dimension::TrafficSource,
        Dimension::UtmCampaign,
        Dimension::Zipcode,
        Dimension::RetentionStatus,
        Dimension::ProgramActivity,
        Dimension::ProgramDestination,
        Dimension::State,
        Dimension::City,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::DeviceType => "device_type",
            Self::TrafficSource => "traffic_source",
            Self::UtmCampaign => "utm_campaign",
            Self::Zipcode => "zipcode",
            Self::RetentionStatus => "retention_status",
            Self::ProgramActivity => "program_activity",
            Self::ProgramDestination => "program_destination",
            Self::State => "state",
            Self::City => "city",
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| Error::validation(format!("unknown dimension: {}", s)))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub event_type: EventType,
    pub event_date: Option<NaiveDateTime>,
    pub event_timestamp: Option<NaiveDateTime>,
    /// Not unique per row; one member produces many events.
    pub user_id: Option<String>,
    pub browser: Option<String>,
    pub device_type: Option<String>,
    pub traffic_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub zipcode: Option<String>,
    pub retention_status: Option<String>,
    pub program_activity: Option<String>,
    pub program_destination: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub user_agent: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
}

impl CanonicalEvent {
    /// An event of the given type with every optional field null.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            event_date: None,
            event_timestamp: None,
            user_id: None,
            browser: None,
            device_type: None,
            traffic_source: None,
            utm_campaign: None,
            zipcode: None,
            retention_status: None,
            program_activity: None,
            program_destination: None,
            state: None,
            city: None,
            user_agent: None,
            weight: None,
            height: None,
            bmi: None,
        }
    }

    /// Value of a categorical attribute.
    pub fn attribute(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::Browser => &self.browser,
            Dimension::DeviceType => &self.device_type,
            Dimension::TrafficSource => &self.traffic_source,
            Dimension::UtmCampaign => &self.utm_campaign,
            Dimension::Zipcode => &self.zipcode,
            Dimension::RetentionStatus => &self.retention_status,
            Dimension::ProgramActivity => &self.program_activity,
            Dimension::ProgramDestination => &self.program_destination,
            Dimension::State => &self.state,
            Dimension::City => &self.city,
        };
        value.as_deref()
    }

    /// Renders the value of a canonical field as a raw JSON cell.
    fn raw_cell(&self, field: &str) -> Value {
        fn text(v: &Option<String>) -> Value {
            v.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
        }
        fn timestamp(v: &Option<NaiveDateTime>) -> Value {
            v.map_or(Value::Null, |t| {
                Value::String(t.format(TIMESTAMP_FORMAT).to_string())
            })
        }
        fn number(v: &Option<f64>) -> Value {
            v.and_then(Number::from_f64).map_or(Value::Null, Value::Number)
        }

        match field {
            "event_type" => Value::String(self.event_type.as_str().to_string()),
            "event_date" => timestamp(&self.event_date),
            "event_timestamp" => timestamp(&self.event_timestamp),
            "user_id" => text(&self.user_id),
            "browser" => text(&self.browser),
            "device_type" => text(&self.device_type),
            "traffic_source" => text(&self.traffic_source),
            "utm_campaign" => text(&self.utm_campaign),
            "zipcode" => text(&self.zipcode),
            "retention_status" => text(&self.retention_status),
            "program_activity" => text(&self.program_activity),
            "program_destination" => text(&self.program_destination),
            "state" => text(&self.state),
            "city" => text(&self.city),
            "user_agent" => text(&self.user_agent),
            "weight" => number(&self.weight),
            "height" => number(&self.height),
            "bmi" => number(&self.bmi),
            _ => Value::Null,
        }
    }
}

/// The canonical table. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventTable {
    events: Vec<CanonicalEvent>,
}

impl EventTable {
    pub fn new(events: Vec<CanonicalEvent>) -> Self {
        Self { events }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<CanonicalEvent> {
        self.events
    }

    /// Renders the table back to raw rows under the canonical column names.
    pub fn to_raw(&self) -> RawTable {
        let columns = EVENT_SCHEMA.column_names();
        let mut raw = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for event in &self.events {
            raw.push_row(columns.iter().map(|c| event.raw_cell(c)).collect());
        }
        raw
    }
}

impl FromIterator<CanonicalEvent> for EventTable {
    fn from_iter<I: IntoIterator<Item = CanonicalEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
