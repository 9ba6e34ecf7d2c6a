use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::role::Role;
use super::scoring::ScoreMatrix;

/// Minimum score a candidate column must reach to be assigned to a role
pub const ACCEPTANCE_THRESHOLD: f64 = 20.0;

///
/// A conflict-free role→column assignment
///
/// Each column is referenced by at most one role; roles without an
/// acceptable candidate are left unmapped. Assignments can also be built or
/// adjusted manually (e.g., when a user overrides the automatic choice).
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoleAssignment {
    assigned: HashMap<Role, String>,
}

impl RoleAssignment {
    /// Create an empty assignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Column mapped to the given role, if any
    pub fn column_for(&self, role: Role) -> Option<&str> {
        self.assigned.get(&role).map(String::as_str)
    }

    /// Map a role to a column, replacing any previous mapping of that role
    pub fn assign(&mut self, role: Role, column: impl Into<String>) {
        self.assigned.insert(role, column.into());
    }

    /// Remove the mapping of a role, if present
    pub fn unassign(&mut self, role: Role) {
        self.assigned.remove(&role);
    }

    /// Whether all required roles (case ID, activity, timestamp) are mapped
    pub fn is_complete(&self) -> bool {
        Role::REQUIRED
            .into_iter()
            .all(|r| self.assigned.contains_key(&r))
    }

    /// Iterator over the (role, column) pairs, in fixed role order
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL
            .into_iter()
            .filter_map(|r| self.column_for(r).map(|c| (r, c)))
    }
}

/// Resolve the score matrix into a conflict-free assignment
///
/// Constrained greedy selection, deliberately not a maximum-weight bipartite
/// matching (role count ≤ 4; the greedy order is part of the observable
/// contract):
/// 1. Among the remaining roles, pick the one with the highest
///    best-available score over unused columns — recomputed each step, since
///    assigning a column shrinks the pool. Ties go to the earlier role in
///    the fixed role order.
/// 2. Give that role its best unused column (ties go to the earlier column
///    in table order), but only if the score reaches
///    [`ACCEPTANCE_THRESHOLD`]; otherwise the role stays unmapped.
/// 3. Mark the column as used and repeat with the remaining roles.
pub fn resolve_assignment(matrix: &ScoreMatrix) -> RoleAssignment {
    let mut assignment = RoleAssignment::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut remaining: Vec<Role> = Role::ALL.to_vec();

    while !remaining.is_empty() {
        // Strictly-greater comparison: on ties the first role in the fixed
        // order wins, since `remaining` keeps that order.
        let mut top_idx = 0;
        let mut top_score = f64::NEG_INFINITY;
        for (idx, role) in remaining.iter().enumerate() {
            let best = matrix
                .best_unused(*role, &used)
                .map(|(_, s)| s)
                .unwrap_or(0.0);
            if best > top_score {
                top_score = best;
                top_idx = idx;
            }
        }

        let role = remaining.remove(top_idx);
        if let Some((column, score)) = matrix.best_unused(role, &used) {
            if score >= ACCEPTANCE_THRESHOLD {
                let column = column.to_string();
                used.insert(column.clone());
                assignment.assign(role, column);
            }
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::column_profile::profile_columns;
    use crate::mapping::keywords::KeywordConfig;
    use crate::table::table_struct::{Column, Table};

    fn matrix_for(table: &Table) -> ScoreMatrix {
        ScoreMatrix::compute(&profile_columns(table), &KeywordConfig::default())
    }

    #[test]
    fn test_no_column_is_assigned_twice() {
        // "id" is a keyword candidate for case_id and scores for resource too
        let table = Table::new(vec![Column::text("id", vec![Some("a"), Some("b"), Some("a")])]);
        let assignment = resolve_assignment(&matrix_for(&table));
        let mapped: Vec<&str> = assignment.iter().map(|(_, c)| c).collect();
        let distinct: HashSet<&str> = mapped.iter().copied().collect();
        assert_eq!(mapped.len(), distinct.len());
    }

    #[test]
    fn test_low_scores_leave_roles_unmapped() {
        let table = Table::new(vec![Column::float("x", vec![Some(1.5), Some(2.5)])]);
        let assignment = resolve_assignment(&matrix_for(&table));
        assert!(assignment.column_for(Role::Activity).is_none());
        assert!(assignment.column_for(Role::Timestamp).is_none());
        assert!(!assignment.is_complete());
    }

    #[test]
    fn test_empty_table_maps_nothing() {
        let assignment = resolve_assignment(&matrix_for(&Table::new(vec![])));
        for role in Role::ALL {
            assert!(assignment.column_for(role).is_none());
        }
    }

    #[test]
    fn test_manual_override() {
        let mut assignment = RoleAssignment::new();
        assignment.assign(Role::CaseId, "OrderID");
        assignment.assign(Role::CaseId, "TraceID");
        assert_eq!(assignment.column_for(Role::CaseId), Some("TraceID"));
        assignment.unassign(Role::CaseId);
        assert!(assignment.column_for(Role::CaseId).is_none());
    }
}
