use serde::{Deserialize, Serialize};

use super::assignment::{resolve_assignment, RoleAssignment};
use super::column_profile::profile_columns;
use super::confidence::ConfidenceTier;
use super::keywords::KeywordConfig;
use super::role::Role;
use super::scoring::ScoreMatrix;
use crate::table::table_struct::Table;

/// Maximum number of alternative candidates reported per role
pub const MAX_ALTERNATIVES: usize = 3;

///
/// Result of mapping one role to a column
///
/// Produced for every role, in fixed role order. An unmapped role carries
/// `column: None`, a score of 0.0 and the `Failed` tier. Alternatives are
/// ranked by descending score and exclude the chosen column; a presentation
/// layer can offer them for manual override.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingResult {
    /// The role this result refers to
    pub role: Role,
    /// The chosen column, if an acceptable candidate existed
    pub column: Option<String>,
    /// Final score of the chosen column, in `[0, 100]` (0.0 if unmapped)
    pub score: f64,
    /// Discrete confidence classification of the score
    pub confidence: ConfidenceTier,
    /// Up to [`MAX_ALTERNATIVES`] next-best `(column, score)` candidates
    pub alternatives: Vec<(String, f64)>,
}

impl RoleAssignment {
    /// Build an assignment from mapping results (skipping unmapped roles)
    pub fn from_results(results: &[MappingResult]) -> Self {
        let mut assignment = RoleAssignment::new();
        for result in results {
            if let Some(column) = &result.column {
                assignment.assign(result.role, column.clone());
            }
        }
        assignment
    }
}

///
/// Infers which table columns correspond to the process-mining roles
///
/// Stateless apart from its (immutable) keyword configuration: every call
/// recomputes profiles, the score matrix and the assignment from its inputs,
/// so concurrent use on independent tables is safe and results are
/// deterministic.
///
/// ```rust
/// use column_mapping::{ColumnMapper, Role, Table, Column};
///
/// let table = Table::new(vec![
///     Column::int("order_id", vec![Some(1), Some(1), Some(2)]),
///     Column::text("activity", vec![Some("Create"), Some("Approve"), Some("Create")]),
///     Column::text("timestamp", vec![
///         Some("2023-10-06T09:00:00"),
///         Some("2023-10-06T10:30:00"),
///         Some("2023-10-06T11:00:00"),
///     ]),
/// ]);
/// let results = ColumnMapper::new().map_columns(&table);
/// assert_eq!(results[0].role, Role::CaseId);
/// assert_eq!(results[0].column.as_deref(), Some("order_id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnMapper {
    keywords: KeywordConfig,
}

impl ColumnMapper {
    /// Create a mapper with the built-in keyword vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with a custom keyword vocabulary (e.g., another locale)
    pub fn with_keywords(keywords: KeywordConfig) -> Self {
        Self { keywords }
    }

    /// The keyword configuration this mapper scores with
    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    /// Compute the dense role×column score matrix for a table
    ///
    /// Exposed for diagnostics and UIs; [`ColumnMapper::map_columns`] uses
    /// the same computation internally.
    pub fn score_matrix(&self, table: &Table) -> ScoreMatrix {
        let profiles = profile_columns(table);
        ScoreMatrix::compute(&profiles, &self.keywords)
    }

    /// Map the table's columns to roles
    ///
    /// Returns one [`MappingResult`] per role, in fixed role order
    /// (`case_id`, `activity`, `timestamp`, `resource`). Never fails on
    /// malformed, empty or degenerate tables — such input degrades to
    /// unmapped roles with the `Failed` tier.
    pub fn map_columns(&self, table: &Table) -> Vec<MappingResult> {
        let matrix = self.score_matrix(table);
        let assignment = resolve_assignment(&matrix);

        Role::ALL
            .into_iter()
            .map(|role| {
                let column = assignment.column_for(role).map(|c| c.to_string());
                let score = column
                    .as_deref()
                    .and_then(|c| matrix.get(role, c))
                    .unwrap_or(0.0);
                let alternatives = matrix.ranked(role, column.as_deref(), MAX_ALTERNATIVES);
                MappingResult {
                    role,
                    column,
                    score,
                    confidence: ConfidenceTier::from_score(score),
                    alternatives,
                }
            })
            .collect()
    }
}
