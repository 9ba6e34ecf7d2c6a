use serde::{Deserialize, Serialize};

use super::assignment::RoleAssignment;
use super::role::Role;
use crate::table::table_struct::{CellValue, Column, Table};
use crate::utils::timestamp_utils::cell_timestamp;

/// Null ratio above which a mapped timestamp column triggers a warning
pub const TIMESTAMP_NULL_WARN_RATIO: f64 = 0.05;
/// Number of non-null timestamp values probed during validation
pub const TIMESTAMP_VALIDATION_SAMPLE: usize = 10;
/// Row count below which the log is considered too small for robust analysis
pub const MIN_RECOMMENDED_ROWS: usize = 10;

///
/// Severity of a [`Diagnostic`]
///
/// `Error` blocks meaningful analysis and should be surfaced prominently;
/// `Warning` means analysis may proceed with reduced confidence. The engine
/// only classifies — whether to proceed despite errors is caller policy.
///
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks meaningful analysis
    Error,
    /// Analysis may proceed with reduced confidence
    Warning,
}

///
/// A single advisory finding about an assignment
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity classification
    pub severity: Severity,
    /// Human-readable description, including the affected role/column
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Run semantic sanity checks against an assignment (possibly partial)
///
/// Returns an ordered list of diagnostics; never fails and never blocks the
/// assignment. Checks, in order:
/// - each required role: error if unmapped or mapped to an absent column;
/// - case ID: error on any missing value;
/// - activity: error on any missing value, warning on fewer than 2 distinct values;
/// - timestamp: warning above [`TIMESTAMP_NULL_WARN_RATIO`] missing values,
///   error if the bounded sample fails to parse (or contains no values at all);
/// - globally: error if the case ID column holds fewer than 2 distinct cases,
///   warning below [`MIN_RECOMMENDED_ROWS`] rows.
pub fn validate_assignment(table: &Table, assignment: &RoleAssignment) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let row_count = table.row_count().max(1);

    for role in Role::REQUIRED {
        let column = assignment
            .column_for(role)
            .and_then(|name| table.column(name));
        let Some(column) = column else {
            diagnostics.push(Diagnostic::error(format!(
                "Required role '{role}' is not mapped to any column."
            )));
            continue;
        };

        let null_ratio = column.null_count() as f64 / row_count as f64;
        match role {
            Role::CaseId => {
                if null_ratio > 0.0 {
                    diagnostics.push(Diagnostic::error(format!(
                        "Case ID column '{}' contains missing values.",
                        column.name
                    )));
                }
            }
            Role::Activity => {
                if null_ratio > 0.0 {
                    diagnostics.push(Diagnostic::error(format!(
                        "Activity column '{}' contains missing values.",
                        column.name
                    )));
                }
                if column.unique_count() < 2 {
                    diagnostics.push(Diagnostic::warning(format!(
                        "Activity column '{}' has only one distinct value; analysis results will be limited.",
                        column.name
                    )));
                }
            }
            Role::Timestamp => {
                if null_ratio > TIMESTAMP_NULL_WARN_RATIO {
                    diagnostics.push(Diagnostic::warning(format!(
                        "Timestamp column '{}' has {:.1}% missing values.",
                        column.name,
                        null_ratio * 100.0
                    )));
                }
                if !timestamp_sample_parses(column) {
                    diagnostics.push(Diagnostic::error(format!(
                        "Timestamp column '{}' has an unrecognized date format.",
                        column.name
                    )));
                }
            }
            Role::Resource => {}
        }
    }

    if let Some(case_column) = assignment
        .column_for(Role::CaseId)
        .and_then(|name| table.column(name))
    {
        if case_column.unique_count() < 2 {
            diagnostics.push(Diagnostic::error(
                "Only one case found; at least 2 cases are required.",
            ));
        }
    }

    if row_count < MIN_RECOMMENDED_ROWS {
        diagnostics.push(Diagnostic::warning(format!(
            "Only {row_count} events in total; analysis results will be limited."
        )));
    }

    diagnostics
}

/// Whether the first [`TIMESTAMP_VALIDATION_SAMPLE`] non-null values of the
/// column all parse as timestamps
///
/// An entirely null column fails the check: a timestamp role without a
/// single usable value cannot support analysis. Numeric cells count as
/// parseable iff they fall in the plausible epoch-seconds range, consistent
/// with the scoring heuristic.
fn timestamp_sample_parses(column: &Column) -> bool {
    let sample: Vec<&CellValue> = column
        .non_null_cells()
        .take(TIMESTAMP_VALIDATION_SAMPLE)
        .collect();
    if sample.is_empty() {
        return false;
    }
    sample.iter().all(|cell| cell_timestamp(cell).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_struct::Column;

    fn has_error(diagnostics: &[Diagnostic], fragment: &str) -> bool {
        diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains(fragment))
    }

    #[test]
    fn test_unmapped_required_roles_are_errors() {
        let table = Table::new(vec![]);
        let diagnostics = validate_assignment(&table, &RoleAssignment::new());
        assert!(has_error(&diagnostics, "case_id"));
        assert!(has_error(&diagnostics, "activity"));
        assert!(has_error(&diagnostics, "timestamp"));
    }

    #[test]
    fn test_mapping_to_absent_column_is_an_error() {
        let table = Table::new(vec![Column::text("a", vec![Some("x")])]);
        let mut assignment = RoleAssignment::new();
        assignment.assign(Role::CaseId, "gone");
        let diagnostics = validate_assignment(&table, &assignment);
        assert!(has_error(&diagnostics, "case_id"));
    }

    #[test]
    fn test_nulls_in_case_id_and_activity_are_errors() {
        let table = Table::new(vec![
            Column::text("case", vec![Some("c1"), None, Some("c2")]),
            Column::text("act", vec![Some("a"), Some("b"), None]),
            Column::text(
                "ts",
                vec![
                    Some("2023-01-01T10:00:00"),
                    Some("2023-01-01T11:00:00"),
                    Some("2023-01-01T12:00:00"),
                ],
            ),
        ]);
        let mut assignment = RoleAssignment::new();
        assignment.assign(Role::CaseId, "case");
        assignment.assign(Role::Activity, "act");
        assignment.assign(Role::Timestamp, "ts");
        let diagnostics = validate_assignment(&table, &assignment);
        assert!(has_error(&diagnostics, "Case ID column 'case'"));
        assert!(has_error(&diagnostics, "Activity column 'act'"));
        assert!(!has_error(&diagnostics, "Timestamp"));
    }

    #[test]
    fn test_single_case_is_an_error_despite_successful_mapping() {
        let table = Table::new(vec![
            Column::text(
                "case",
                vec![Some("C1"); 12],
            ),
            Column::text(
                "act",
                (0..12)
                    .map(|i| if i % 2 == 0 { Some("Create") } else { Some("Approve") })
                    .collect(),
            ),
            Column::text("ts", vec![Some("2023-01-01T10:00:00"); 12]),
        ]);
        let mut assignment = RoleAssignment::new();
        assignment.assign(Role::CaseId, "case");
        assignment.assign(Role::Activity, "act");
        assignment.assign(Role::Timestamp, "ts");
        let diagnostics = validate_assignment(&table, &assignment);
        assert!(has_error(&diagnostics, "at least 2 cases"));
    }

    #[test]
    fn test_small_log_warns() {
        let table = Table::new(vec![Column::text("case", vec![Some("c1"), Some("c2")])]);
        let mut assignment = RoleAssignment::new();
        assignment.assign(Role::CaseId, "case");
        let diagnostics = validate_assignment(&table, &assignment);
        assert!(diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("events in total")));
    }
}
