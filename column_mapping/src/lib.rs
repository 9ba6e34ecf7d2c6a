#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// The in-memory table abstraction consumed by the inference engine
///
pub mod table {
    /// [`Table`], [`Column`] and [`CellValue`] structs
    pub mod table_struct;

    #[doc(inline)]
    pub use table_struct::{CellValue, Column, ColumnDType, Table};
}

///
/// Column-to-role inference: profiling, scoring, assignment, confidence and validation
///
pub mod mapping {
    /// Greedy conflict-free role→column assignment
    pub mod assignment;
    /// [`ColumnMapper`](column_mapper::ColumnMapper) orchestration and [`MappingResult`](column_mapper::MappingResult)
    pub mod column_mapper;
    /// Per-column statistical/type profiles
    pub mod column_profile;
    /// Discrete confidence classification of final scores
    pub mod confidence;
    /// Injectable role-keyword vocabularies and name normalization
    pub mod keywords;
    /// The fixed four-role enumeration
    pub mod role;
    /// Multi-signal (column, role) compatibility scoring
    pub mod scoring;
    /// Semantic sanity checks for a chosen assignment
    pub mod validation;

    #[cfg(test)]
    mod tests;
}

///
/// Statistics over a mapped table (overview, activities, variants)
///
pub mod analysis {
    /// Process statistics computed from a table plus a role assignment
    pub mod log_statistics;
}

/// Util module with smaller helper functions
pub mod utils {
    /// Permissive timestamp parsing for ad-hoc tabular data
    pub mod timestamp_utils;
}

#[doc(inline)]
pub use mapping::column_mapper::{ColumnMapper, MappingResult};

#[doc(inline)]
pub use mapping::role::{Role, UnknownRoleError};

#[doc(inline)]
pub use mapping::assignment::RoleAssignment;

#[doc(inline)]
pub use mapping::confidence::ConfidenceTier;

#[doc(inline)]
pub use mapping::keywords::KeywordConfig;

#[doc(inline)]
pub use mapping::column_profile::ColumnProfile;

#[doc(inline)]
pub use mapping::scoring::ScoreMatrix;

#[doc(inline)]
pub use mapping::validation::{validate_assignment, Diagnostic, Severity};

#[doc(inline)]
pub use table::table_struct::{CellValue, Column, ColumnDType, Table};

///
/// Serialize mapping results as a JSON [`String`]
///
pub fn mapping_results_to_json(results: &[MappingResult]) -> String {
    serde_json::to_string(results).unwrap_or_default()
}

///
/// Deserialize mapping results from a JSON [`String`]
///
pub fn json_to_mapping_results(json: &str) -> Result<Vec<MappingResult>, serde_json::Error> {
    serde_json::from_str(json)
}
