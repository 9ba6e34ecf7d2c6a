//! Process statistics over a mapped table
//!
//! Computes overview metrics, per-activity statistics and process variants
//! directly from a table plus a role assignment, without constructing a full
//! event log first. Events with unparseable timestamps are skipped wherever
//! a timestamp is required; the functions never fail.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mapping::assignment::RoleAssignment;
use crate::mapping::role::Role;
use crate::table::table_struct::{CellValue, Table};
use crate::utils::timestamp_utils::cell_timestamp;

/// Default number of variants returned by [`compute_variants`]
pub const DEFAULT_TOP_VARIANTS: usize = 10;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Overview metrics of a mapped event log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessOverview {
    /// Number of distinct cases
    pub num_cases: usize,
    /// Total number of events (rows)
    pub num_events: usize,
    /// Number of distinct activities
    pub num_activities: usize,
    /// Earliest parseable event timestamp
    pub start: Option<DateTime<Utc>>,
    /// Latest parseable event timestamp
    pub end: Option<DateTime<Utc>>,
    /// Mean case duration in hours (over cases with parseable timestamps)
    pub avg_case_duration_hours: f64,
    /// Median case duration in hours (over cases with parseable timestamps)
    pub median_case_duration_hours: f64,
    /// Mean number of events per case
    pub avg_events_per_case: f64,
}

/// Frequency and duration statistics of a single activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityStats {
    /// Activity label
    pub activity: String,
    /// Number of events carrying this activity
    pub frequency: usize,
    /// Percentage of cases in which the activity occurs (1 decimal)
    pub case_coverage_pct: f64,
    /// Mean time to the next event within the same case, in hours (1 decimal)
    pub avg_duration_hours: f64,
}

/// Frequency and duration statistics of a process variant (activity sequence)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantStats {
    /// Activity sequence of the variant, in event order
    pub variant: Vec<String>,
    /// Number of cases following this variant
    pub frequency: usize,
    /// Percentage of cases following this variant (1 decimal)
    pub coverage_pct: f64,
    /// Mean case duration of the variant, in hours (1 decimal)
    pub avg_duration_hours: f64,
}

/// One event row projected onto the mapped roles
#[derive(Debug, Clone)]
struct CaseEvent {
    case: String,
    activity: String,
    timestamp: Option<DateTime<Utc>>,
}

/// Project the table onto (case, activity, timestamp) tuples
///
/// Returns `None` when any required role is unmapped or mapped to an absent
/// column. Rows with a missing case or activity cell are skipped.
fn collect_events(table: &Table, assignment: &RoleAssignment) -> Option<Vec<CaseEvent>> {
    let case_col = table.column(assignment.column_for(Role::CaseId)?)?;
    let activity_col = table.column(assignment.column_for(Role::Activity)?)?;
    let timestamp_col = table.column(assignment.column_for(Role::Timestamp)?)?;

    let events = (0..table.row_count())
        .filter_map(|row| {
            let case = case_col.cells.get(row).filter(|c| !c.is_null())?;
            let activity = activity_col.cells.get(row).filter(|c| !c.is_null())?;
            let timestamp = timestamp_col
                .cells
                .get(row)
                .unwrap_or(&CellValue::Null);
            Some(CaseEvent {
                case: case.to_string(),
                activity: activity.to_string(),
                timestamp: cell_timestamp(timestamp),
            })
        })
        .collect();
    Some(events)
}

/// Group events by case, each case's events sorted by timestamp
///
/// Events without a parseable timestamp sort first within their case (their
/// relative row order is preserved).
fn events_by_case(events: Vec<CaseEvent>) -> HashMap<String, Vec<CaseEvent>> {
    let mut by_case: HashMap<String, Vec<CaseEvent>> = events
        .into_iter()
        .map(|e| (e.case.clone(), e))
        .into_group_map();
    for case_events in by_case.values_mut() {
        case_events.sort_by_key(|e| e.timestamp);
    }
    by_case
}

/// Duration of a case in hours: latest minus earliest parseable timestamp
fn case_duration_hours(events: &[CaseEvent]) -> Option<f64> {
    let (min, max) = events
        .iter()
        .filter_map(|e| e.timestamp)
        .minmax()
        .into_option()?;
    Some((max - min).num_seconds() as f64 / SECONDS_PER_HOUR)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Compute overview metrics for a mapped table
///
/// Returns `None` if any of the three required roles is unmapped or mapped
/// to a column absent from the table.
pub fn compute_overview(table: &Table, assignment: &RoleAssignment) -> Option<ProcessOverview> {
    let events = collect_events(table, assignment)?;
    let num_events = events.len();
    let num_activities = events.iter().map(|e| e.activity.as_str()).unique().count();

    let (start, end) = match events.iter().filter_map(|e| e.timestamp).minmax().into_option() {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    };

    let by_case = events_by_case(events);
    let num_cases = by_case.len();
    let mut durations: Vec<f64> = by_case
        .values()
        .filter_map(|events| case_duration_hours(events))
        .collect();

    let avg_events_per_case = if num_cases == 0 {
        0.0
    } else {
        num_events as f64 / num_cases as f64
    };

    Some(ProcessOverview {
        num_cases,
        num_events,
        num_activities,
        start,
        end,
        avg_case_duration_hours: round1(mean(&durations)),
        median_case_duration_hours: round1(median(&mut durations)),
        avg_events_per_case: round1(avg_events_per_case),
    })
}

/// Compute per-activity statistics, sorted by descending frequency
///
/// The average duration of an activity is the mean time to the next event
/// within the same case (0.0 for activities that only occur last).
pub fn compute_activity_stats(table: &Table, assignment: &RoleAssignment) -> Vec<ActivityStats> {
    let Some(events) = collect_events(table, assignment) else {
        return Vec::new();
    };
    let by_case = events_by_case(events);
    let num_cases = by_case.len().max(1);

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    let mut cases_with: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut durations: HashMap<&str, Vec<f64>> = HashMap::new();

    for (case, case_events) in &by_case {
        for (idx, event) in case_events.iter().enumerate() {
            *frequency.entry(event.activity.as_str()).or_default() += 1;
            cases_with
                .entry(event.activity.as_str())
                .or_default()
                .push(case.as_str());
            if let (Some(ts), Some(next)) = (
                event.timestamp,
                case_events.get(idx + 1).and_then(|n| n.timestamp),
            ) {
                let hours = (next - ts).num_seconds() as f64 / SECONDS_PER_HOUR;
                if hours >= 0.0 {
                    durations.entry(event.activity.as_str()).or_default().push(hours);
                }
            }
        }
    }

    let mut stats: Vec<ActivityStats> = frequency
        .into_iter()
        .map(|(activity, freq)| {
            let covered = cases_with
                .get(activity)
                .map(|cases| cases.iter().unique().count())
                .unwrap_or(0);
            let avg_duration = durations
                .get(activity)
                .map(|d| mean(d))
                .unwrap_or(0.0);
            ActivityStats {
                activity: activity.to_string(),
                frequency: freq,
                case_coverage_pct: round1(covered as f64 / num_cases as f64 * 100.0),
                avg_duration_hours: round1(avg_duration),
            }
        })
        .collect();
    stats.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.activity.cmp(&b.activity))
    });
    stats
}

/// Compute the `top_n` most frequent process variants
///
/// A variant is the timestamp-ordered activity sequence of a case. Sorted by
/// descending frequency; equally frequent variants are ordered
/// lexicographically for determinism.
pub fn compute_variants(
    table: &Table,
    assignment: &RoleAssignment,
    top_n: usize,
) -> Vec<VariantStats> {
    let Some(events) = collect_events(table, assignment) else {
        return Vec::new();
    };
    let by_case = events_by_case(events);
    let num_cases = by_case.len().max(1);

    let mut grouped: HashMap<Vec<String>, Vec<Option<f64>>> = HashMap::new();
    for case_events in by_case.values() {
        let sequence: Vec<String> = case_events.iter().map(|e| e.activity.clone()).collect();
        grouped
            .entry(sequence)
            .or_default()
            .push(case_duration_hours(case_events));
    }

    let mut variants: Vec<VariantStats> = grouped
        .into_iter()
        .map(|(variant, durations)| {
            let frequency = durations.len();
            let known: Vec<f64> = durations.into_iter().flatten().collect();
            VariantStats {
                variant,
                frequency,
                coverage_pct: round1(frequency as f64 / num_cases as f64 * 100.0),
                avg_duration_hours: round1(mean(&known)),
            }
        })
        .collect();
    variants.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.variant.cmp(&b.variant))
    });
    variants.truncate(top_n);
    variants
}

/// Per-case durations in hours, for cases with at least one parseable timestamp
pub fn case_duration_distribution(table: &Table, assignment: &RoleAssignment) -> Vec<f64> {
    let Some(events) = collect_events(table, assignment) else {
        return Vec::new();
    };
    let by_case = events_by_case(events);
    let mut durations: Vec<f64> = by_case
        .values()
        .filter_map(|events| case_duration_hours(events))
        .collect();
    durations.sort_by(|a, b| a.total_cmp(b));
    durations
}
