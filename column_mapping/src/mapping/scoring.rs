use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::column_profile::ColumnProfile;
use super::keywords::{normalize_column_name, KeywordConfig};
use super::role::Role;
use crate::table::table_struct::ColumnDType;
use crate::utils::timestamp_utils::is_epoch_seconds;

/// Weight of the keyword signal in the combined score
pub const KEYWORD_WEIGHT: f64 = 0.35;
/// Weight of the type signal in the combined score
pub const TYPE_WEIGHT: f64 = 0.35;
/// Weight of the statistical-shape signal in the combined score
pub const STATS_WEIGHT: f64 = 0.30;

const EXACT_KEYWORD_SCORE: f64 = 80.0;
const PARTIAL_KEYWORD_SCORE: f64 = 40.0;

/// Keyword-match sub-score of a column name for a role: 80 (exact), 40 (partial) or 0
///
/// Both the column name and the configured keywords are normalized with
/// [`normalize_column_name`], so matching is invariant under case and
/// separator variation.
pub fn keyword_score(column_name: &str, role: Role, config: &KeywordConfig) -> f64 {
    let normalized = normalize_column_name(column_name);
    let Some(keywords) = config.for_role(role) else {
        return 0.0;
    };

    if keywords
        .exact
        .iter()
        .any(|k| normalize_column_name(k) == normalized)
    {
        return EXACT_KEYWORD_SCORE;
    }

    if keywords
        .partial
        .iter()
        .any(|k| normalized.contains(&normalize_column_name(k)))
    {
        return PARTIAL_KEYWORD_SCORE;
    }

    0.0
}

/// Type-compatibility sub-score of a column profile for a role
///
/// Role-specific table; roughly in `-20..60`. For the timestamp role,
/// numeric columns whose sampled values fall in the plausible
/// UNIX-epoch-seconds range get a weak positive signal, while other numeric
/// columns are penalized.
pub fn type_score(profile: &ColumnProfile, role: Role) -> f64 {
    let dtype = profile.dtype;
    match role {
        Role::Timestamp => {
            if dtype == ColumnDType::Datetime {
                60.0
            } else if profile.is_parseable_datetime {
                50.0
            } else if dtype.is_numeric() {
                let epoch_like = profile
                    .sample_values
                    .iter()
                    .filter_map(|c| c.as_numeric())
                    .any(is_epoch_seconds);
                if epoch_like {
                    30.0
                } else {
                    -20.0
                }
            } else {
                0.0
            }
        }
        Role::CaseId => match dtype {
            ColumnDType::Integer => 25.0,
            ColumnDType::Text => 20.0,
            ColumnDType::Float => -10.0,
            ColumnDType::Datetime => 0.0,
        },
        Role::Activity => match dtype {
            ColumnDType::Text => 30.0,
            ColumnDType::Integer | ColumnDType::Float => -20.0,
            ColumnDType::Datetime => 0.0,
        },
        Role::Resource => {
            if dtype == ColumnDType::Text {
                25.0
            } else {
                0.0
            }
        }
    }
}

/// Statistical-shape sub-score of a column profile for a role
///
/// Encodes the domain assumptions of event logs: case identifiers repeat
/// (several events per case), activity labels repeat even more (few distinct
/// values reused across cases), and timestamps are near-complete.
pub fn stats_score(profile: &ColumnProfile, role: Role) -> f64 {
    let ur = profile.unique_ratio;
    let nr = profile.null_ratio;
    let mut score = 0.0;

    match role {
        Role::CaseId => {
            // unique_ratio varies with events per case: 7 events/case → ≈0.14, 2 events/case → 0.5
            if ur >= 0.5 {
                score += 40.0;
            } else if ur >= 0.05 {
                score += 28.0;
            } else if ur >= 0.01 {
                score += 8.0;
            } else {
                score -= 20.0;
            }
            score += if nr == 0.0 {
                10.0
            } else if nr <= 0.05 {
                5.0
            } else {
                -20.0
            };
        }
        Role::Activity => {
            if (0.001..=0.1).contains(&ur) {
                score += 40.0;
            } else if ur <= 0.3 {
                score += 20.0;
            } else {
                score -= 10.0;
            }
            if (2.0..=30.0).contains(&profile.avg_str_length) {
                score += 15.0;
            }
        }
        Role::Timestamp => {
            if profile.is_parseable_datetime {
                score += 50.0;
            }
            score += if nr <= 0.05 { 10.0 } else { -10.0 };
        }
        Role::Resource => {
            if (0.001..=0.2).contains(&ur) {
                score += 30.0;
            } else if ur <= 0.5 {
                score += 10.0;
            } else {
                score -= 10.0;
            }
        }
    }

    score
}

/// Combined compatibility score of a column for a role, clamped to `[0, 100]`
///
/// `0.35·keyword + 0.35·type + 0.30·stats`; a pure function of the profile
/// and the keyword configuration.
pub fn score_column(profile: &ColumnProfile, role: Role, config: &KeywordConfig) -> f64 {
    let kw = keyword_score(&profile.name, role, config);
    let ty = type_score(profile, role);
    let st = stats_score(profile, role);
    (KEYWORD_WEIGHT * kw + TYPE_WEIGHT * ty + STATS_WEIGHT * st).clamp(0.0, 100.0)
}

///
/// Dense score matrix: every column scored against every role
///
/// Recomputed from scratch for each mapping call; the engine never caches
/// matrices across calls. The original column order is retained for
/// deterministic tie-breaking.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreMatrix {
    columns: Vec<String>,
    scores: HashMap<Role, HashMap<String, f64>>,
}

impl ScoreMatrix {
    /// Score every (column, role) pair
    pub fn compute(profiles: &[ColumnProfile], config: &KeywordConfig) -> Self {
        let columns = profiles.iter().map(|p| p.name.clone()).collect();
        let scores = Role::ALL
            .into_iter()
            .map(|role| {
                let per_column = profiles
                    .iter()
                    .map(|p| (p.name.clone(), score_column(p, role, config)))
                    .collect();
                (role, per_column)
            })
            .collect();
        Self { columns, scores }
    }

    /// Score of a column for a role, if the column exists in the matrix
    pub fn get(&self, role: Role, column: &str) -> Option<f64> {
        self.scores.get(&role).and_then(|m| m.get(column)).copied()
    }

    /// Column names, in their original table order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Best-scoring column for a role among columns not in `used`
    ///
    /// Ties are broken by original column order (the earlier column wins).
    pub fn best_unused(&self, role: Role, used: &HashSet<String>) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for column in &self.columns {
            if used.contains(column) {
                continue;
            }
            let score = self.get(role, column).unwrap_or(0.0);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((column, score)),
            }
        }
        best
    }

    /// Columns ranked by descending score for a role, excluding `exclude`
    ///
    /// The sort is stable, so equal scores keep the original column order.
    /// At most `limit` entries are returned.
    pub fn ranked(&self, role: Role, exclude: Option<&str>, limit: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .columns
            .iter()
            .filter(|c| Some(c.as_str()) != exclude)
            .map(|c| (c.clone(), self.get(role, c).unwrap_or(0.0)))
            .collect();
        ranked.sort_by_key(|(_, s)| std::cmp::Reverse(OrderedFloat(*s)));
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::column_profile::profile_columns;
    use crate::table::table_struct::{Column, Table};

    fn profile_of(column: Column) -> ColumnProfile {
        profile_columns(&Table::new(vec![column])).remove(0)
    }

    #[test]
    fn test_keyword_score_levels() {
        let config = KeywordConfig::default();
        assert_eq!(keyword_score("case_id", Role::CaseId, &config), 80.0);
        assert_eq!(keyword_score("customer_order", Role::CaseId, &config), 40.0);
        assert_eq!(keyword_score("amount", Role::CaseId, &config), 0.0);
    }

    #[test]
    fn test_keyword_score_is_normalization_invariant() {
        let config = KeywordConfig::default();
        for name in ["CaseID", "case_id", "Case-Id", "CASE:ID"] {
            assert_eq!(keyword_score(name, Role::CaseId, &config), 80.0);
        }
    }

    #[test]
    fn test_epoch_seconds_heuristic() {
        let epoch = profile_of(Column::int(
            "t",
            vec![Some(1_700_000_000), Some(1_700_000_060)],
        ));
        assert_eq!(type_score(&epoch, Role::Timestamp), 30.0);

        let plain = profile_of(Column::int("t", vec![Some(1), Some(2)]));
        assert_eq!(type_score(&plain, Role::Timestamp), -20.0);
    }

    #[test]
    fn test_datetime_dtype_outranks_parseable_strings() {
        use chrono::{TimeZone, Utc};
        let parsed = profile_of(Column::date(
            "when",
            vec![
                Some(Utc.with_ymd_and_hms(2023, 10, 6, 9, 0, 0).unwrap()),
                Some(Utc.with_ymd_and_hms(2023, 10, 6, 10, 0, 0).unwrap()),
            ],
        ));
        assert_eq!(type_score(&parsed, Role::Timestamp), 60.0);

        let strings = profile_of(Column::text(
            "when",
            vec![Some("2023-10-06T09:00:00"), Some("2023-10-06T10:00:00")],
        ));
        assert_eq!(type_score(&strings, Role::Timestamp), 50.0);
    }

    #[test]
    fn test_scores_are_clamped_to_range() {
        let table = Table::new(vec![
            Column::float("f", vec![Some(0.5), Some(0.5), Some(0.5)]),
            Column::text("activity", vec![Some("a"), Some("b"), Some("c")]),
        ]);
        let matrix = ScoreMatrix::compute(&profile_columns(&table), &KeywordConfig::default());
        for role in Role::ALL {
            for column in matrix.columns() {
                let score = matrix.get(role, column).unwrap();
                assert!((0.0..=100.0).contains(&score), "{role}/{column}: {score}");
            }
        }
    }

    #[test]
    fn test_best_unused_breaks_ties_by_column_order() {
        let table = Table::new(vec![
            Column::text("a", vec![Some("x"), Some("y")]),
            Column::text("b", vec![Some("x"), Some("y")]),
        ]);
        let matrix = ScoreMatrix::compute(&profile_columns(&table), &KeywordConfig::default());
        let (best, _) = matrix.best_unused(Role::Resource, &HashSet::new()).unwrap();
        assert_eq!(best, "a");

        let used: HashSet<String> = ["a".to_string()].into();
        let (best, _) = matrix.best_unused(Role::Resource, &used).unwrap();
        assert_eq!(best, "b");
    }
}
