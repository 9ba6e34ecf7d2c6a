//! Permissive timestamp parsing shared by column profiling, validation and statistics

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::table::table_struct::CellValue;

/// Lower bound (inclusive) of the plausible UNIX-epoch-seconds range
///
/// 1e9 seconds ≈ 2001-09-09; 2e9 seconds ≈ 2033-05-18. Numeric values in
/// this range are treated as candidate epoch-second timestamps.
pub const EPOCH_SECONDS_MIN: f64 = 1.0e9;
/// Upper bound (exclusive) of the plausible UNIX-epoch-seconds range
pub const EPOCH_SECONDS_MAX: f64 = 2.0e9;

/// Whether a numeric value lies in the plausible UNIX-epoch-seconds range
pub fn is_epoch_seconds(value: f64) -> bool {
    (EPOCH_SECONDS_MIN..EPOCH_SECONDS_MAX).contains(&value)
}

/// Parse a timestamp string to a `DateTime<FixedOffset>`, trying multiple formats.
///
/// Intended for ad-hoc spreadsheet data where the timestamp format is not
/// known upfront. Returns `None` if no format matches; the caller treats an
/// unparseable value as a signal, not as an error.
///
/// # Supported formats (in order of precedence)
/// 1. RFC 3339: `2023-10-06T09:30:21+00:00`
/// 2. ISO 8601 with offset and no colon: `2023-10-06T09:30:21+0000`
/// 3. RFC 2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 4. Naive datetime, optional fractional seconds: `2023-10-06 09:30:21.890421` (assumes UTC)
/// 5. Naive ISO 8601, optional fractional seconds: `2023-10-06T09:30:21` (assumes UTC)
/// 6. Naive datetime with UTC suffix: `2023-10-06 09:30:21 UTC`
/// 7. Day-first datetime: `06/10/2023 09:30:21` (assumes UTC)
/// 8. Date only: `2023-10-06` (midnight UTC)
pub fn parse_timestamp(time: &str) -> Option<DateTime<FixedOffset>> {
    let time = time.trim();
    if time.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Some(dt);
    }

    // "2023-10-06 09:30:21" and "2023-10-06 09:30:21.890421", assuming UTC
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T%.f") {
        return Some(dt.and_utc().into());
    }

    // "2022-01-09T15:00:00" and "2024-10-02T07:55:15.348555", assuming UTC
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%FT%T%.f") {
        return Some(dt.and_utc().into());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%F %T UTC") {
        return Some(dt.and_utc().into());
    }

    // Day-first form common in exported spreadsheets
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%d/%m/%Y %H:%M:%S") {
        return Some(dt.and_utc().into());
    }

    // Date-only cells, mapped to midnight UTC
    if let Ok(d) = NaiveDate::parse_from_str(time, "%F") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().into());
    }

    None
}

/// Extract a UTC timestamp from a typed cell, if possible.
///
/// Date cells are taken verbatim, string cells go through
/// [`parse_timestamp`], and numeric cells are interpreted as epoch seconds
/// iff they lie in the plausible range (see [`is_epoch_seconds`]).
pub fn cell_timestamp(cell: &CellValue) -> Option<DateTime<Utc>> {
    match cell {
        CellValue::Date(dt) => Some(*dt),
        CellValue::String(s) => parse_timestamp(s).map(|dt| dt.with_timezone(&Utc)),
        CellValue::Int(i) => {
            let v = *i as f64;
            if is_epoch_seconds(v) {
                DateTime::from_timestamp(*i, 0)
            } else {
                None
            }
        }
        CellValue::Float(f) => {
            if is_epoch_seconds(*f) {
                DateTime::from_timestamp(*f as i64, 0)
            } else {
                None
            }
        }
        CellValue::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        assert!(parse_timestamp("2023-10-06T09:30:21+00:00").is_some());
    }

    #[test]
    fn test_offset_without_colon() {
        assert!(parse_timestamp("2023-10-06T09:30:21+0000").is_some());
    }

    #[test]
    fn test_naive_datetime_with_fraction() {
        assert!(parse_timestamp("2023-10-06 09:30:21.890421").is_some());
    }

    #[test]
    fn test_naive_iso() {
        assert!(parse_timestamp("2023-10-06T09:30:21").is_some());
    }

    #[test]
    fn test_day_first() {
        assert!(parse_timestamp("06/10/2023 09:30:21").is_some());
    }

    #[test]
    fn test_date_only() {
        let dt = parse_timestamp("2023-10-06").unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-10-06T00:00:00+00:00");
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(parse_timestamp("Approve Order").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_cell_timestamp_epoch_seconds() {
        assert!(cell_timestamp(&CellValue::Int(1_700_000_000)).is_some());
        // Small integers are not epoch timestamps
        assert!(cell_timestamp(&CellValue::Int(42)).is_none());
        assert!(cell_timestamp(&CellValue::Null).is_none());
    }
}
