use std::collections::HashSet;

use crate::mapping::assignment::ACCEPTANCE_THRESHOLD;
use crate::mapping::confidence::ConfidenceTier;
use crate::mapping::role::Role;
use crate::mapping::validation::{validate_assignment, Severity};
use crate::table::table_struct::{Column, Table};
use crate::{ColumnMapper, RoleAssignment};

/// 100-row order-handling table with clearly named columns
fn order_table() -> Table {
    let labels = ["Create Order", "Approve Order", "Ship Order", "Invoice", "Archive"];
    let order_ids: Vec<Option<i64>> = (1..=100).map(Some).collect();
    let activities: Vec<Option<&str>> = (0..100).map(|i| Some(labels[i % labels.len()])).collect();
    let timestamps: Vec<String> = (0..100)
        .map(|i| format!("2023-10-06T09:{:02}:{:02}", i / 60, i % 60))
        .collect();
    Table::new(vec![
        Column::int("OrderID", order_ids),
        Column::text("Activity", activities),
        Column::text("Timestamp", timestamps.iter().map(|s| Some(s.as_str())).collect()),
    ])
}

#[test]
fn test_maps_clearly_named_order_table() {
    let results = ColumnMapper::new().map_columns(&order_table());

    assert_eq!(
        results.iter().map(|r| r.role).collect::<Vec<_>>(),
        Role::ALL.to_vec()
    );

    assert_eq!(results[0].column.as_deref(), Some("OrderID"));
    assert_eq!(results[1].column.as_deref(), Some("Activity"));
    assert_eq!(results[2].column.as_deref(), Some("Timestamp"));
    assert_eq!(results[3].column, None);

    // Exact contractual scores: keyword 80 for all three, then
    // type/stats per role table
    assert!((results[0].score - 51.75).abs() < 1e-9);
    assert!((results[1].score - 55.0).abs() < 1e-9);
    assert!((results[2].score - 63.5).abs() < 1e-9);

    for result in &results[..3] {
        assert_eq!(result.confidence, ConfidenceTier::Medium);
    }
    assert_eq!(results[3].confidence, ConfidenceTier::Failed);
}

#[test]
fn test_alternatives_exclude_chosen_column() {
    let results = ColumnMapper::new().map_columns(&order_table());
    for result in &results {
        assert!(result.alternatives.len() <= 3);
        if let Some(chosen) = &result.column {
            assert!(result.alternatives.iter().all(|(c, _)| c != chosen));
        }
    }
}

#[test]
fn test_no_two_roles_share_a_column() {
    let results = ColumnMapper::new().map_columns(&order_table());
    let mapped: Vec<&String> = results.iter().filter_map(|r| r.column.as_ref()).collect();
    let distinct: HashSet<&String> = mapped.iter().copied().collect();
    assert_eq!(mapped.len(), distinct.len());
}

#[test]
fn test_mapping_is_deterministic() {
    let table = order_table();
    let mapper = ColumnMapper::new();
    let first = mapper.map_columns(&table);
    let second = mapper.map_columns(&table);
    assert_eq!(first, second);
}

#[test]
fn test_all_matrix_scores_are_in_range() {
    let matrix = ColumnMapper::new().score_matrix(&order_table());
    for role in Role::ALL {
        for column in matrix.columns() {
            let score = matrix.get(role, column).unwrap();
            assert!((0.0..=100.0).contains(&score));
        }
    }
}

#[test]
fn test_contested_column_goes_to_exactly_one_role() {
    // "id" is a keyword candidate for case_id and the only column at all;
    // the most confident role takes it, the rest stay unmapped.
    let table = Table::new(vec![Column::text("id", vec![Some("a"), Some("b"), Some("a")])]);
    let results = ColumnMapper::new().map_columns(&table);

    assert_eq!(results[0].role, Role::CaseId);
    assert_eq!(results[0].column.as_deref(), Some("id"));
    assert!(results[0].score >= ACCEPTANCE_THRESHOLD);

    assert_eq!(results[1].role, Role::Activity);
    assert_eq!(results[1].column, None);
    assert_eq!(results[1].score, 0.0);
    assert_eq!(results[1].confidence, ConfidenceTier::Failed);
}

#[test]
fn test_all_null_timestamp_column_fails_validation() {
    // The keyword still proposes the column, but validation must flag it
    let cases: Vec<String> = (0..20).map(|i| format!("C{}", i / 2)).collect();
    let table = Table::new(vec![
        Column::text("case", cases.iter().map(|s| Some(s.as_str())).collect()),
        Column::text(
            "act",
            (0..20).map(|i| Some(if i % 2 == 0 { "Create" } else { "Done" })).collect(),
        ),
        Column::text("timestamp", vec![None; 20]),
    ]);
    let results = ColumnMapper::new().map_columns(&table);
    assert_eq!(results[2].column.as_deref(), Some("timestamp"));

    let assignment = RoleAssignment::from_results(&results);
    let diagnostics = validate_assignment(&table, &assignment);
    assert!(diagnostics.iter().any(|d| {
        d.severity == Severity::Error && d.message.contains("Timestamp column 'timestamp'")
    }));
}

#[test]
fn test_single_case_table_maps_but_fails_validation() {
    let timestamps: Vec<String> = (0..30).map(|i| format!("2023-10-06T10:{i:02}:00")).collect();
    let table = Table::new(vec![
        Column::text("case_id", vec![Some("C1"); 30]),
        Column::text(
            "activity",
            (0..30).map(|i| Some(if i % 2 == 0 { "Create" } else { "Done" })).collect(),
        ),
        Column::text("timestamp", timestamps.iter().map(|s| Some(s.as_str())).collect()),
    ]);
    let results = ColumnMapper::new().map_columns(&table);
    assert_eq!(results[0].column.as_deref(), Some("case_id"));

    let assignment = RoleAssignment::from_results(&results);
    let diagnostics = validate_assignment(&table, &assignment);
    assert!(diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.message.contains("at least 2 cases")));
}

#[test]
fn test_epoch_seconds_column_maps_to_timestamp() {
    let values: Vec<Option<i64>> = (0..50).map(|i| Some(1_700_000_000 + i * 60)).collect();
    let table = Table::new(vec![Column::int("event_time", values)]);
    let results = ColumnMapper::new().map_columns(&table);
    assert_eq!(results[2].role, Role::Timestamp);
    assert_eq!(results[2].column.as_deref(), Some("event_time"));
}

#[test]
fn test_results_survive_json_round_trip() {
    let results = ColumnMapper::new().map_columns(&order_table());
    let json = crate::mapping_results_to_json(&results);
    let parsed = crate::json_to_mapping_results(&json).unwrap();
    assert_eq!(results, parsed);
}
