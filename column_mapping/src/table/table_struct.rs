use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

///
/// A single typed cell of a [`Column`]
///
/// Missing values are represented explicitly as [`CellValue::Null`].
///
/// Tip: If you know the expected `CellValue` type, make use of the `try_as_xxx` functions (e.g., [`CellValue::try_as_string`])
///
/// ```rust
/// use column_mapping::table::table_struct::CellValue;
/// let v = CellValue::Float(42.0);
///
/// let f = v.try_as_float().unwrap();
/// assert_eq!(*f, 42.0);
/// ````
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum CellValue {
    /// String values
    String(String),
    #[serde(with = "ts_milliseconds")]
    /// DateTime values
    Date(DateTime<Utc>),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
    /// Missing value
    Null,
}

impl CellValue {
    ///
    /// Try to get cell value as String
    ///
    /// Returns `Some()` of inner value if value is of variant [`CellValue::String`] and `None` otherwise
    ///
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            CellValue::String(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get cell value as date
    ///
    /// Returns `Some()` of inner value if value is of variant [`CellValue::Date`] and `None` otherwise
    ///
    pub fn try_as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            CellValue::Date(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get cell value as int
    ///
    /// Returns `Some()` of inner value if value is of variant [`CellValue::Int`] and `None` otherwise
    ///
    pub fn try_as_int(&self) -> Option<&i64> {
        match self {
            CellValue::Int(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get cell value as float
    ///
    /// Returns `Some()` of inner value if value is of variant [`CellValue::Float`] and `None` otherwise
    ///
    pub fn try_as_float(&self) -> Option<&f64> {
        match self {
            CellValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the cell is a missing value ([`CellValue::Null`])
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric value of the cell, if it is of an [`CellValue::Int`] or [`CellValue::Float`] variant
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::String(v) => write!(f, "{v}"),
            CellValue::Date(v) => write!(f, "{}", v.to_rfc3339()),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

/// Hashable identity of a non-null cell, used for distinct-value counting
#[derive(PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Str(&'a str),
    Int(i64),
    /// Float identity via its bit pattern
    FloatBits(u64),
    /// Date identity via its millisecond timestamp
    Millis(i64),
}

impl CellValue {
    fn key(&self) -> Option<CellKey<'_>> {
        match self {
            CellValue::String(v) => Some(CellKey::Str(v)),
            CellValue::Int(v) => Some(CellKey::Int(*v)),
            CellValue::Float(v) => Some(CellKey::FloatBits(v.to_bits())),
            CellValue::Date(v) => Some(CellKey::Millis(v.timestamp_millis())),
            CellValue::Null => None,
        }
    }
}

///
/// Declared element type of a [`Column`]
///
/// Only the four categories the inference engine distinguishes are modeled.
///
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDType {
    /// Integer columns
    Integer,
    /// Floating-point columns
    Float,
    /// Text columns
    Text,
    /// Datetime columns (already parsed by the loader)
    Datetime,
}

impl ColumnDType {
    /// Whether the dtype is [`ColumnDType::Integer`] or [`ColumnDType::Float`]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnDType::Integer | ColumnDType::Float)
    }
}

///
/// A named column: a declared dtype and an ordered sequence of [`CellValue`]s
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name (expected to be unique within a [`Table`])
    pub name: String,
    /// Declared element type
    pub dtype: ColumnDType,
    /// Cell values, in row order
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Create a new column with the provided name, dtype and cells
    pub fn new(name: impl Into<String>, dtype: ColumnDType, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            dtype,
            cells,
        }
    }

    /// Helper to create a text column from optional string values
    pub fn text(name: impl Into<String>, values: Vec<Option<&str>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(s) => CellValue::String(s.to_string()),
                None => CellValue::Null,
            })
            .collect();
        Self::new(name, ColumnDType::Text, cells)
    }

    /// Helper to create an integer column from optional values
    pub fn int(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(i) => CellValue::Int(i),
                None => CellValue::Null,
            })
            .collect();
        Self::new(name, ColumnDType::Integer, cells)
    }

    /// Helper to create a float column from optional values
    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(x) => CellValue::Float(x),
                None => CellValue::Null,
            })
            .collect();
        Self::new(name, ColumnDType::Float, cells)
    }

    /// Helper to create a datetime column from optional values
    pub fn date(name: impl Into<String>, values: Vec<Option<DateTime<Utc>>>) -> Self {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Some(d) => CellValue::Date(d),
                None => CellValue::Null,
            })
            .collect();
        Self::new(name, ColumnDType::Datetime, cells)
    }

    /// Number of [`CellValue::Null`] cells
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Iterator over the non-null cells, in row order
    pub fn non_null_cells(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().filter(|c| !c.is_null())
    }

    /// Number of distinct non-null values
    pub fn unique_count(&self) -> usize {
        self.cells
            .iter()
            .filter_map(CellValue::key)
            .collect::<HashSet<_>>()
            .len()
    }
}

///
/// An in-memory table: an ordered set of uniquely-named [`Column`]s
///
/// Column order is preserved; it is significant for deterministic
/// tie-breaking during role assignment.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Columns, in their original order
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new table from the provided columns
    ///
    /// Column names are expected to be unique; lookups return the first match.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Number of rows (length of the longest column; 0 for an empty table)
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterator over the column names, in column order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_count_ignores_nulls() {
        let col = Column::text("c", vec![Some("a"), None, Some("b"), Some("a")]);
        assert_eq!(col.unique_count(), 2);
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn test_row_count_of_uneven_table() {
        let table = Table::new(vec![
            Column::int("a", vec![Some(1), Some(2)]),
            Column::text("b", vec![Some("x")]),
        ]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_column_lookup_preserves_order() {
        let table = Table::new(vec![
            Column::int("a", vec![Some(1)]),
            Column::text("b", vec![Some("x")]),
        ]);
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(table.column("b").is_some());
        assert!(table.column("missing").is_none());
    }
}
