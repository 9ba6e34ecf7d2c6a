use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::table::table_struct::{CellValue, Column, ColumnDType, Table};
use crate::utils::timestamp_utils::cell_timestamp;

/// Maximum number of non-null values sampled per column
///
/// Bounds the cost of datetime-parseability probing and string-length
/// averaging on very large tables. A false negative is possible if the first
/// values of a column are atypical.
pub const PROFILE_SAMPLE_SIZE: usize = 50;

/// Minimum fraction of sampled values that must parse as a datetime for a
/// column to count as datetime-parseable
pub const DATETIME_PARSE_THRESHOLD: f64 = 0.85;

///
/// Statistical and type profile of a single column
///
/// Null and uniqueness statistics are computed over the full column; the
/// value sample, datetime-parseability and string lengths are bounded by
/// [`PROFILE_SAMPLE_SIZE`].
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnProfile {
    /// Column name
    pub name: String,
    /// Declared element type of the column
    pub dtype: ColumnDType,
    /// Fraction of missing values, in `[0, 1]`
    pub null_ratio: f64,
    /// Number of distinct non-null values
    pub unique_count: usize,
    /// `unique_count / row_count`, in `[0, 1]`
    pub unique_ratio: f64,
    /// First non-null values, in row order (at most [`PROFILE_SAMPLE_SIZE`])
    pub sample_values: Vec<CellValue>,
    /// Whether at least [`DATETIME_PARSE_THRESHOLD`] of the sample parses as a datetime
    pub is_parseable_datetime: bool,
    /// Mean string length over the sample (0.0 for non-text columns)
    pub avg_str_length: f64,
}

/// Profile every column of the table
///
/// Never fails: empty, all-null and single-value columns degrade to
/// zero-filled fields. The row count is floored at 1 so that all ratios are
/// well-defined even for empty tables.
pub fn profile_columns(table: &Table) -> Vec<ColumnProfile> {
    let row_count = table.row_count().max(1);
    table
        .columns
        .par_iter()
        .map(|col| profile_column(col, row_count))
        .collect()
}

fn profile_column(column: &Column, row_count: usize) -> ColumnProfile {
    let null_ratio = column.null_count() as f64 / row_count as f64;
    let unique_count = column.unique_count();
    let unique_ratio = unique_count as f64 / row_count as f64;
    let sample_values: Vec<CellValue> = column
        .non_null_cells()
        .take(PROFILE_SAMPLE_SIZE)
        .cloned()
        .collect();

    let is_parseable_datetime = datetime_parse_ratio(&sample_values) >= DATETIME_PARSE_THRESHOLD;

    let avg_str_length = if column.dtype == ColumnDType::Text {
        avg_string_length(&sample_values)
    } else {
        0.0
    };

    ColumnProfile {
        name: column.name.clone(),
        dtype: column.dtype,
        null_ratio,
        unique_count,
        unique_ratio,
        sample_values,
        is_parseable_datetime,
        avg_str_length,
    }
}

/// Fraction of sampled values that parse as a datetime (0.0 for an empty sample)
///
/// Date cells parse trivially; string cells go through the permissive
/// parser. Numeric cells do not count here — the epoch-seconds heuristic is
/// a separate, weaker signal handled by the type scorer.
fn datetime_parse_ratio(sample: &[CellValue]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let parsed = sample
        .iter()
        .filter(|cell| match cell {
            CellValue::Date(_) => true,
            CellValue::String(_) => cell_timestamp(cell).is_some(),
            _ => false,
        })
        .count();
    parsed as f64 / sample.len() as f64
}

fn avg_string_length(sample: &[CellValue]) -> f64 {
    let lengths: Vec<usize> = sample
        .iter()
        .filter_map(|c| c.try_as_string())
        .map(|s| s.chars().count())
        .collect();
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}
