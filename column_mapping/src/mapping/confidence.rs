use serde::{Deserialize, Serialize};

///
/// Discrete confidence tier of a role→column assignment
///
/// Machine-readable classification; human-facing label text is a
/// presentation concern (see [`ConfidenceTier::label`]) and may be localized
/// independently.
///
/// ```rust
/// use column_mapping::ConfidenceTier;
/// assert_eq!(ConfidenceTier::from_score(80.0), ConfidenceTier::High);
/// assert_eq!(ConfidenceTier::from_score(79.99), ConfidenceTier::Medium);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Score ≥ 80
    High,
    /// Score ≥ 50
    Medium,
    /// Score ≥ 30
    Low,
    /// Score < 30
    Failed,
}

impl ConfidenceTier {
    /// Classify a final score, evaluated high→low with the first match winning
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ConfidenceTier::High
        } else if score >= 50.0 {
            ConfidenceTier::Medium
        } else if score >= 30.0 {
            ConfidenceTier::Low
        } else {
            ConfidenceTier::Failed
        }
    }

    /// Stable machine-readable key of the tier
    pub fn key(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
            ConfidenceTier::Failed => "failed",
        }
    }

    /// Human-facing label (presentation-only, not part of the core contract)
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "🟢 high",
            ConfidenceTier::Medium => "🟡 medium",
            ConfidenceTier::Low => "🟠 low",
            ConfidenceTier::Failed => "🔴 failed",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
