//! Filter engine: categorical and date-window selection over the canonical table.
//!
//! The categorical predicate is evaluated once into a [`BaseSelection`];
//! any number of date windows can then be applied to it. Views borrow rows
//! from the table and never modify it.

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::coerce::parse_date;
use crate::events::{CanonicalEvent, Dimension, EventTable, EventType};

/// Selector label meaning "no restriction".
pub const ALL_LABEL: &str = "All";

/// Categorical equality predicate on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DimensionFilter {
    All,
    Equals { dimension: Dimension, value: String },
}

impl DimensionFilter {
    /// Builds a filter from a selector value. `None`, blank and `"All"` are unrestricted.
    pub fn new(dimension: Dimension, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case(ALL_LABEL) => Self::All,
            Some(v) => Self::Equals {
                dimension,
                value: v.to_string(),
            },
        }
    }

    pub fn matches(&self, event: &CanonicalEvent) -> bool {
        match self {
            Self::All => true,
            Self::Equals { dimension, value } => event
                .attribute(*dimension)
                .is_some_and(|v| v.trim() == value),
        }
    }
}

/// Closed date range, inclusive of both calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range, or `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The `months` months ending on `today`.
    pub fn last_months(today: NaiveDate, months: u32) -> Self {
        let start = today.checked_sub_months(Months::new(months)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Resolves user-supplied endpoints.
    ///
    /// Falls back to `default` when an endpoint is missing or unparseable,
    /// or when the pair is reversed. Never fails.
    pub fn resolve(start: Option<&str>, end: Option<&str>, default: DateRange) -> Self {
        let parsed = start
            .and_then(parse_date)
            .zip(end.and_then(parse_date))
            .and_then(|(s, e)| Self::new(s, e));
        parsed.unwrap_or(default)
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        let day = at.date();
        self.start <= day && day <= self.end
    }
}

/// Read-only rows satisfying a categorical filter and a date window.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a CanonicalEvent>,
}

impl<'a> FilteredView<'a> {
    pub fn new(rows: Vec<&'a CanonicalEvent>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a CanonicalEvent] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CanonicalEvent> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Narrows the view to one event type.
    pub fn of_type(&self, event_type: &EventType) -> FilteredView<'a> {
        FilteredView::new(
            self.iter()
                .filter(|e| &e.event_type == event_type)
                .collect(),
        )
    }
}

/// Categorical selection evaluated once, reusable across date windows.
#[derive(Debug, Clone)]
pub struct BaseSelection<'a> {
    table: &'a EventTable,
    mask: Vec<bool>,
}

impl<'a> BaseSelection<'a> {
    /// Rows passing the categorical predicate, ignoring dates.
    pub fn matched(&self) -> usize {
        self.mask.iter().filter(|m| **m).count()
    }

    /// Applies a date window. Rows without an event date never match.
    pub fn window(&self, range: &DateRange) -> FilteredView<'a> {
        let table: &'a EventTable = self.table;
        FilteredView::new(
            table
                .iter()
                .zip(&self.mask)
                .filter(|(event, selected)| {
                    **selected && event.event_date.is_some_and(|d| range.contains(&d))
                })
                .map(|(event, _)| event)
                .collect(),
        )
    }
}

/// Entry point for selecting rows from the canonical table.
pub struct FilterEngine<'a> {
    table: &'a EventTable,
}

impl<'a> FilterEngine<'a> {
    pub fn new(table: &'a EventTable) -> Self {
        Self { table }
    }

    /// Evaluates the categorical predicate into a reusable selection.
    pub fn base(&self, filter: &DimensionFilter) -> BaseSelection<'a> {
        BaseSelection {
            table: self.table,
            mask: self.table.iter().map(|e| filter.matches(e)).collect(),
        }
    }

    /// Shorthand for `base(filter).window(range)`.
    pub fn view(&self, filter: &DimensionFilter, range: &DateRange) -> FilteredView<'a> {
        self.base(filter).window(range)
    }

    /// Selector options: `"All"` followed by sorted distinct non-blank values.
    pub fn options(&self, dimension: Dimension) -> Vec<String> {
        let values: BTreeSet<&str> = self
            .table
            .iter()
            .filter_map(|e| e.attribute(dimension))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        std::iter::once(ALL_LABEL.to_string())
            .chain(values.into_iter().map(String::from))
            .collect()
    }
}
