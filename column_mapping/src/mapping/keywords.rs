use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::role::Role;

///
/// Keyword vocabulary for a single role
///
/// `exact` entries must equal the whole (normalized) column name; `partial`
/// entries match as substrings. Both sides are normalized with
/// [`normalize_column_name`] before comparison.
///
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RoleKeywords {
    /// Names that identify the role outright (e.g., `case_id` for the case ID role)
    pub exact: HashSet<String>,
    /// Fragments that hint at the role (e.g., `trace`, `order`)
    pub partial: HashSet<String>,
}

impl RoleKeywords {
    /// Create a vocabulary from string slices
    pub fn new(exact: &[&str], partial: &[&str]) -> Self {
        Self {
            exact: exact.iter().map(|s| s.to_string()).collect(),
            partial: partial.iter().map(|s| s.to_string()).collect(),
        }
    }
}

///
/// Keyword vocabularies for all roles
///
/// Injectable configuration: substituting an alternate vocabulary (e.g., for
/// another locale or a domain-specific naming convention) changes which
/// column names are recognized without touching the scoring algorithm.
/// [`KeywordConfig::default`] carries the built-in English + Korean
/// vocabulary.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordConfig {
    roles: HashMap<Role, RoleKeywords>,
}

impl KeywordConfig {
    /// Create a configuration from per-role vocabularies
    pub fn new(roles: HashMap<Role, RoleKeywords>) -> Self {
        Self { roles }
    }

    /// Vocabulary for the given role, if configured
    pub fn for_role(&self, role: Role) -> Option<&RoleKeywords> {
        self.roles.get(&role)
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let mut roles = HashMap::new();
        roles.insert(
            Role::CaseId,
            RoleKeywords::new(
                &[
                    "caseid",
                    "case_id",
                    "traceid",
                    "trace_id",
                    "instanceid",
                    "process_id",
                    "orderid",
                    "order_id",
                ],
                &[
                    "case", "trace", "instance", "order", "id", "key", "no", "num", "number",
                    "code", "번호", "코드", "주문", "케이스", "건", "식별",
                ],
            ),
        );
        roles.insert(
            Role::Activity,
            RoleKeywords::new(
                &[
                    "activity",
                    "activityname",
                    "activity_name",
                    "task",
                    "event",
                    "action",
                    "step",
                    "concept:name",
                    "eventname",
                    "taskname",
                    "conceptname",
                ],
                &[
                    "act", "task", "event", "action", "step", "name", "type", "활동", "작업",
                    "이벤트", "업무", "단계", "활동명", "작업명",
                ],
            ),
        );
        roles.insert(
            Role::Timestamp,
            RoleKeywords::new(
                &[
                    "timestamp",
                    "time",
                    "datetime",
                    "date",
                    "time:timestamp",
                    "starttime",
                    "start_time",
                    "endtime",
                    "end_time",
                    "completetime",
                    "complete_time",
                    "createdat",
                    "eventtime",
                ],
                &[
                    "time", "date", "dt", "ts", "at", "when", "start", "end", "complete",
                    "created", "시각", "시간", "일시", "날짜", "일자", "타임",
                ],
            ),
        );
        roles.insert(
            Role::Resource,
            RoleKeywords::new(
                &[
                    "resource",
                    "org:resource",
                    "user",
                    "performer",
                    "assignee",
                    "operator",
                    "employee",
                ],
                &[
                    "resource", "user", "person", "agent", "role", "담당자", "사용자", "수행자",
                    "작업자", "담당", "직원",
                ],
            ),
        );
        Self { roles }
    }
}

/// Normalize a column name for keyword comparison
///
/// Lower-cases the name and strips spaces, underscores, colons and hyphens,
/// so that `CaseID`, `case_id`, `Case-Id` and `CASE:ID` all compare equal.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | ':' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_is_separator_and_case_invariant() {
        for name in ["CaseID", "case_id", "Case-Id", "CASE:ID", "case id"] {
            assert_eq!(normalize_column_name(name), "caseid");
        }
    }

    #[test]
    fn test_default_config_covers_all_roles() {
        let config = KeywordConfig::default();
        for role in Role::ALL {
            let kw = config.for_role(role).unwrap();
            assert!(!kw.exact.is_empty());
            assert!(!kw.partial.is_empty());
        }
    }
}
