//! Schema normalization: raw rows to canonical events.
//!
//! Column names are normalized first, then every canonical field is bound to
//! the raw columns matching its aliases. Fields with no matching column are
//! synthesized as all-null. Event types are mapped onto the canonical
//! vocabulary. Normalization never fails.

use serde_json::Value;
use tracing::debug;

use crate::coerce::{coerce_number, coerce_text, coerce_timestamp};
use crate::events::{CanonicalEvent, EventTable, EventType};
use crate::raw::RawTable;
use crate::schema::{normalize_column_names, FieldKind, FieldSpec, SchemaDescriptor, EVENT_SCHEMA};

/// Raw column positions bound to one canonical field, in alias priority order.
struct FieldBinding {
    field: &'static FieldSpec,
    columns: Vec<usize>,
}

impl FieldBinding {
    /// Row-wise coalesce: first non-null cell across the bound columns.
    fn pick<'a>(&self, raw: &'a RawTable, row: usize) -> &'a Value {
        self.columns
            .iter()
            .map(|&c| raw.cell(row, c))
            .find(|v| !v.is_null())
            .unwrap_or(&Value::Null)
    }
}

/// Maps raw tables onto the canonical event schema.
pub struct Normalizer {
    schema: SchemaDescriptor,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            schema: EVENT_SCHEMA,
        }
    }

    /// Normalizes a raw table. An empty input gives an empty table.
    pub fn normalize(&self, raw: &RawTable) -> EventTable {
        if raw.is_empty() {
            return EventTable::empty();
        }

        let bindings = self.bind(raw);
        (0..raw.len())
            .map(|row| self.build_event(&bindings, raw, row))
            .collect()
    }

    fn bind(&self, raw: &RawTable) -> Vec<FieldBinding> {
        let names = normalize_column_names(raw.columns());

        self.schema
            .fields()
            .iter()
            .filter(|f| !f.derived)
            .map(|field| {
                let columns: Vec<usize> = field
                    .aliases
                    .iter()
                    .filter_map(|alias| names.iter().position(|n| n == alias))
                    .collect();
                if columns.is_empty() {
                    debug!(field = field.name, "column absent, synthesizing nulls");
                }
                FieldBinding { field, columns }
            })
            .collect()
    }

    fn build_event(&self, bindings: &[FieldBinding], raw: &RawTable, row: usize) -> CanonicalEvent {
        let mut event = CanonicalEvent::new(EventType::Other(String::new()));

        for binding in bindings {
            let cell = binding.pick(raw, row);
            match binding.field.kind {
                FieldKind::EventType => {
                    event.event_type = EventType::normalize(coerce_text(cell).as_deref());
                }
                FieldKind::Timestamp => {
                    let value = coerce_timestamp(cell);
                    match binding.field.name {
                        "event_date" => event.event_date = value,
                        "event_timestamp" => event.event_timestamp = value,
                        _ => {}
                    }
                }
                FieldKind::Number => {
                    let value = coerce_number(cell);
                    match binding.field.name {
                        "weight" => event.weight = value,
                        "height" => event.height = value,
                        _ => {}
                    }
                }
                FieldKind::Text => {
                    let value = coerce_text(cell);
                    let slot = match binding.field.name {
                        "user_id" => &mut event.user_id,
                        "browser" => &mut event.browser,
                        "device_type" => &mut event.device_type,
                        "traffic_source" => &mut event.traffic_source,
                        "utm_campaign" => &mut event.utm_campaign,
                        "zipcode" => &mut event.zipcode,
                        "retention_status" => &mut event.retention_status,
                        "program_activity" => &mut event.program_activity,
                        "program_destination" => &mut event.program_destination,
                        "state" => &mut event.state,
                        "city" => &mut event.city,
                        "user_agent" => &mut event.user_agent,
                        _ => continue,
                    };
                    *slot = value;
                }
            }
        }

        event
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
