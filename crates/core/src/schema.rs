//! Canonical schema descriptor and column-name normalization.
//!
//! Every field a [`CanonicalEvent`](crate::events::CanonicalEvent) carries is
//! listed here with its kind and the raw column aliases it is read from.
//! The normalizer populates every field, so consumers never check whether a
//! column exists.

use std::collections::{HashMap, HashSet};

/// Value kind of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Canonical event vocabulary with passthrough.
    EventType,
    /// Nullable string.
    Text,
    /// Nullable timestamp, date-only accepted.
    Timestamp,
    /// Nullable float.
    Number,
}

/// One canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    /// Raw column names in priority order. The first non-null wins per row.
    pub aliases: &'static [&'static str],
    /// Computed by the enricher rather than read from the source.
    pub derived: bool,
}

impl FieldSpec {
    const fn read(name: &'static str, kind: FieldKind, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            aliases,
            derived: false,
        }
    }
}

/// Set of canonical fields.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDescriptor {
    fields: &'static [FieldSpec],
}

impl SchemaDescriptor {
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in canonical column order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

const EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "event_type",
        kind: FieldKind::EventType,
        nullable: false,
        aliases: &["event_type"],
        derived: false,
    },
    FieldSpec::read("event_date", FieldKind::Timestamp, &["event_date"]),
    FieldSpec::read("event_timestamp", FieldKind::Timestamp, &["event_timestamp"]),
    FieldSpec::read("user_id", FieldKind::Text, &["user_id"]),
    FieldSpec::read("browser", FieldKind::Text, &["browser"]),
    FieldSpec::read("device_type", FieldKind::Text, &["device_type"]),
    FieldSpec::read("traffic_source", FieldKind::Text, &["traffic_source"]),
    FieldSpec::read("utm_campaign", FieldKind::Text, &["utm_campaign"]),
    FieldSpec::read("zipcode", FieldKind::Text, &["zipcode", "zip", "member_zip"]),
    FieldSpec::read("retention_status", FieldKind::Text, &["retention_status"]),
    FieldSpec::read("program_activity", FieldKind::Text, &["program_activity"]),
    FieldSpec::read("program_destination", FieldKind::Text, &["program_destination"]),
    FieldSpec::read("state", FieldKind::Text, &["state", "member_state", "state_code"]),
    FieldSpec::read("city", FieldKind::Text, &["city", "member_city"]),
    FieldSpec::read("user_agent", FieldKind::Text, &["user_agent"]),
    FieldSpec::read("weight", FieldKind::Number, &["weight"]),
    FieldSpec::read("height", FieldKind::Number, &["height"]),
    FieldSpec {
        name: "bmi",
        kind: FieldKind::Number,
        nullable: true,
        aliases: &[],
        derived: true,
    },
];

/// The one schema this backend reports on.
pub const EVENT_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    fields: EVENT_FIELDS,
};

/// Trims, lower-cases and de-duplicates raw column names.
///
/// The first occurrence of a name keeps it bare. Later duplicates get the
/// smallest `_N` suffix (N starting at 1) that collides with neither an
/// already assigned name nor a name that appears bare elsewhere in the input.
pub fn normalize_column_names<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let cleaned: Vec<String> = columns
        .iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .collect();

    let reserved: HashSet<&str> = cleaned.iter().map(String::as_str).collect();
    let mut assigned: HashSet<String> = HashSet::with_capacity(cleaned.len());
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(cleaned.len());

    for name in &cleaned {
        if assigned.insert(name.clone()) {
            out.push(name.clone());
            continue;
        }

        let counter = next_suffix.entry(name.as_str()).or_insert(1);
        loop {
            let candidate = format!("{}_{}", name, counter);
            *counter += 1;
            if !reserved.contains(candidate.as_str()) && assigned.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
        }
    }

    out
}
