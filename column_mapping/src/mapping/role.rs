use serde::{Deserialize, Serialize};
use std::str::FromStr;

///
/// The four semantic roles the engine infers columns for
///
/// The variant order is significant and fixed (`case_id`, `activity`,
/// `timestamp`, `resource`): results are reported in this order and ties
/// during conflict resolution are broken by it.
///
/// ```rust
/// use column_mapping::Role;
/// let role: Role = "case_id".parse().unwrap();
/// assert_eq!(role, Role::CaseId);
/// assert!("order_id".parse::<Role>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unique identifier of a process instance (case)
    CaseId,
    /// Name of the step/action an event represents
    Activity,
    /// Point in time at which an event occurred
    Timestamp,
    /// Performer of an event (person, team, system)
    Resource,
}

impl Role {
    /// All roles, in the fixed significant order
    pub const ALL: [Role; 4] = [Role::CaseId, Role::Activity, Role::Timestamp, Role::Resource];

    /// The roles required for process-mining analysis (all but [`Role::Resource`])
    pub const REQUIRED: [Role; 3] = [Role::CaseId, Role::Activity, Role::Timestamp];

    /// Stable machine-readable key of the role
    pub fn key(&self) -> &'static str {
        match self {
            Role::CaseId => "case_id",
            Role::Activity => "activity",
            Role::Timestamp => "timestamp",
            Role::Resource => "resource",
        }
    }

    /// Whether the role must be mapped for analysis to be meaningful
    pub fn is_required(&self) -> bool {
        !matches!(self, Role::Resource)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

///
/// Error for a role name outside the fixed four-role enumeration
///
/// This signals a programming-contract violation by the caller, as opposed
/// to a data-quality problem (which the engine reports via diagnostics and
/// degraded scores, never via errors).
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleError(
    /// The rejected role name
    pub String,
);

impl std::fmt::Display for UnknownRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown role name: '{}'", self.0)
    }
}

impl std::error::Error for UnknownRoleError {}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| UnknownRoleError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order_is_fixed() {
        assert_eq!(
            Role::ALL.map(|r| r.key()),
            ["case_id", "activity", "timestamp", "resource"]
        );
        assert!(Role::Timestamp.is_required());
        assert!(!Role::Resource.is_required());
    }

    #[test]
    fn test_round_trip_from_str() {
        for role in Role::ALL {
            assert_eq!(role.key().parse::<Role>().unwrap(), role);
        }
        let err = "concept:name".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRoleError("concept:name".to_string()));
    }
}
