//! Metric aggregation over filtered views.
//!
//! Every function here is a pure function of its input view. Period series
//! are sparse: periods without matching rows are absent, and callers fill
//! gaps if they need a dense axis.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::str::FromStr;
use validator::Validate;

use crate::error::Error;
use crate::events::{CanonicalEvent, Dimension, EventType};
use crate::filter::FilteredView;

/// Rates used when a view holds no canonical event types.
///
/// The defaults are unverified placeholders, not derived business figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct HeuristicRates {
    /// Share of crossovers assumed to click through.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_click_through")]
    pub click_through: f64,
    /// Share of crossovers assumed to sign up.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_signup_rate")]
    pub signup_rate: f64,
}

fn default_click_through() -> f64 {
    0.33
}

fn default_signup_rate() -> f64 {
    0.05
}

impl Default for HeuristicRates {
    fn default() -> Self {
        Self {
            click_through: default_click_through(),
            signup_rate: default_signup_rate(),
        }
    }
}

/// How funnel counts were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exactness {
    /// Counted from canonical event types.
    Exact,
    /// Approximated from row counts and heuristic rates.
    Estimated,
}

/// Counts per funnel stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelCounts {
    pub crossover: u64,
    pub link_click: u64,
    pub signup: u64,
    pub improvement: u64,
    pub exactness: Exactness,
}

/// Funnel counts for a view.
///
/// Counts exactly when at least one row carries a canonical event type.
/// Otherwise every row is taken as a crossover, clicks are the rows with a
/// traffic source (or `click_through` of the total when none has one),
/// signups are `signup_rate` of the total and improvements are zero.
pub fn funnel_counts(view: &FilteredView<'_>, rates: &HeuristicRates) -> FunnelCounts {
    if view.iter().any(|e| e.event_type.is_canonical()) {
        let mut counts = FunnelCounts {
            crossover: 0,
            link_click: 0,
            signup: 0,
            improvement: 0,
            exactness: Exactness::Exact,
        };
        for event in view.iter() {
            match event.event_type {
                EventType::Crossover => counts.crossover += 1,
                EventType::LinkClick => counts.link_click += 1,
                EventType::Signup => counts.signup += 1,
                EventType::Improvement => counts.improvement += 1,
                EventType::Other(_) => {}
            }
        }
        return counts;
    }

    let total = view.len() as u64;
    let with_source = view.iter().filter(|e| e.traffic_source.is_some()).count() as u64;
    let link_click = if with_source > 0 {
        with_source
    } else {
        share(rates.click_through, total)
    };

    FunnelCounts {
        crossover: total,
        link_click,
        signup: share(rates.signup_rate, total),
        improvement: 0,
        exactness: Exactness::Estimated,
    }
}

fn share(rate: f64, total: u64) -> u64 {
    (rate * total as f64).floor() as u64
}

/// Link clicks per crossover, in percent. Zero when there are no crossovers.
pub fn conversion_rate(link_clicks: u64, crossovers: u64) -> f64 {
    if crossovers == 0 {
        return 0.0;
    }
    link_clicks as f64 / crossovers as f64 * 100.0
}

/// Headline KPIs for a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(flatten)]
    pub counts: FunnelCounts,
    pub conversion_rate: f64,
}

impl MetricSnapshot {
    pub fn from_view(view: &FilteredView<'_>, rates: &HeuristicRates) -> Self {
        let counts = funnel_counts(view, rates);
        Self {
            conversion_rate: conversion_rate(counts.link_click, counts.crossover),
            counts,
        }
    }
}

/// Period length for time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Month,
    Day,
}

impl Granularity {
    /// Truncates a timestamp to the start of its period.
    pub fn period_of(&self, at: &NaiveDateTime) -> NaiveDate {
        let date = at.date();
        match self {
            Self::Day => date,
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(Self::Month),
            "day" | "daily" | "d" => Ok(Self::Day),
            other => Err(Error::validation(format!("unknown granularity: {}", other))),
        }
    }
}

/// Distinct members (or rows) per group key.
///
/// Member counting applies when any row of the input carries a user id;
/// otherwise each row counts once.
struct DistinctCounter<'a, K> {
    users: HashMap<K, HashSet<&'a str>>,
    rows: HashMap<K, u64>,
    any_user: bool,
}

impl<'a, K: std::hash::Hash + Eq + Clone + Ord> DistinctCounter<'a, K> {
    fn new() -> Self {
        Self {
            users: HashMap::new(),
            rows: HashMap::new(),
            any_user: false,
        }
    }

    fn add(&mut self, key: K, event: &'a CanonicalEvent) {
        *self.rows.entry(key.clone()).or_insert(0) += 1;
        let users = self.users.entry(key).or_default();
        if let Some(user) = event.user_id.as_deref() {
            users.insert(user);
            self.any_user = true;
        }
    }

    fn finish(self) -> BTreeMap<K, u64> {
        if self.any_user {
            self.users
                .into_iter()
                .map(|(k, set)| (k, set.len() as u64))
                .collect()
        } else {
            self.rows.into_iter().collect()
        }
    }
}

fn selected<'v, 'a>(
    view: &'v FilteredView<'a>,
    event_filter: Option<&'v EventType>,
) -> impl Iterator<Item = &'a CanonicalEvent> + 'v {
    view.iter()
        .filter(move |e| event_filter.map_or(true, |t| &e.event_type == t))
}

/// Distinct members in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCount {
    pub period: NaiveDate,
    pub unique_ids: u64,
}

/// Distinct members per period, ascending. Undated rows are skipped.
pub fn unique_by_period(
    view: &FilteredView<'_>,
    event_filter: Option<&EventType>,
    granularity: Granularity,
) -> Vec<PeriodCount> {
    let mut counter = DistinctCounter::new();
    for event in selected(view, event_filter) {
        if let Some(at) = event.event_date {
            counter.add(granularity.period_of(&at), event);
        }
    }

    counter
        .finish()
        .into_iter()
        .map(|(period, unique_ids)| PeriodCount { period, unique_ids })
        .collect()
}

/// Distinct members in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub unique_ids: u64,
}

/// Distinct members per category of `dimension`, largest first.
///
/// Rows without a value for the dimension are skipped. Ties sort by
/// category name.
pub fn breakdown(
    view: &FilteredView<'_>,
    dimension: Dimension,
    event_filter: Option<&EventType>,
    top_n: Option<usize>,
) -> Vec<CategoryCount> {
    let mut counter = DistinctCounter::new();
    for event in selected(view, event_filter) {
        if let Some(category) = event.attribute(dimension) {
            counter.add(category.to_string(), event);
        }
    }

    let mut rows: Vec<CategoryCount> = counter
        .finish()
        .into_iter()
        .map(|(category, unique_ids)| CategoryCount {
            category,
            unique_ids,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.unique_ids
            .cmp(&a.unique_ids)
            .then_with(|| a.category.cmp(&b.category))
    });
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    rows
}

/// One period of a destination pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    pub period: NaiveDate,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

impl PivotRow {
    pub fn get(&self, destination: &str) -> u64 {
        self.counts.get(destination).copied().unwrap_or(0)
    }
}

/// Distinct members per (period, program destination), one column per destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationPivot {
    pub destinations: Vec<String>,
    pub rows: Vec<PivotRow>,
}

/// Pivots distinct members by period and program destination.
///
/// Every row carries every destination column, zero-filled. The `required`
/// destinations are always present as columns even when no row mentions
/// them. Rows without a destination or a date are skipped.
pub fn destination_pivot(
    view: &FilteredView<'_>,
    event_filter: Option<&EventType>,
    granularity: Granularity,
    required: &[String],
) -> DestinationPivot {
    let mut counter = DistinctCounter::new();
    for event in selected(view, event_filter) {
        if let (Some(at), Some(dest)) = (event.event_date, event.program_destination.as_deref()) {
            counter.add((granularity.period_of(&at), dest.to_string()), event);
        }
    }
    let cells = counter.finish();

    let destinations: BTreeSet<String> = cells
        .keys()
        .map(|(_, dest)| dest.clone())
        .chain(required.iter().cloned())
        .collect();
    let periods: BTreeSet<NaiveDate> = cells.keys().map(|(period, _)| *period).collect();

    let rows = periods
        .into_iter()
        .map(|period| PivotRow {
            period,
            counts: destinations
                .iter()
                .map(|dest| {
                    let n = cells.get(&(period, dest.clone())).copied().unwrap_or(0);
                    (dest.clone(), n)
                })
                .collect(),
        })
        .collect();

    DestinationPivot {
        destinations: destinations.into_iter().collect(),
        rows,
    }
}

/// Crossovers, link clicks and their conversion rate in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionPoint {
    pub period: NaiveDate,
    pub crossovers: u64,
    pub link_clicks: u64,
    pub conversion_rate: f64,
}

/// Outer join of unique crossovers and unique link clicks per period.
pub fn conversion_trend(view: &FilteredView<'_>, granularity: Granularity) -> Vec<ConversionPoint> {
    let mut merged: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for p in unique_by_period(view, Some(&EventType::Crossover), granularity) {
        merged.entry(p.period).or_default().0 = p.unique_ids;
    }
    for p in unique_by_period(view, Some(&EventType::LinkClick), granularity) {
        merged.entry(p.period).or_default().1 = p.unique_ids;
    }

    merged
        .into_iter()
        .map(|(period, (crossovers, link_clicks))| ConversionPoint {
            period,
            crossovers,
            link_clicks,
            conversion_rate: conversion_rate(link_clicks, crossovers),
        })
        .collect()
}
