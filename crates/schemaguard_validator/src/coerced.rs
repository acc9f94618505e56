//! Typed, row-aligned output of coercion.

use crate::dataset::serialize_float;
use chrono::{DateTime, Utc};
use schemaguard_core::LogicalType;
use serde::Serialize;

/// A cell after coercion to its column's logical type.
///
/// `Null` and `Invalid` are the two missing markers: `Null` means no value
/// was present, `Invalid` means a value was present but could not be
/// coerced. Neither shortens the column.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CoercedValue {
    /// No value present
    Null,
    /// Value present but not coercible
    Invalid,
    /// Integer value
    Integer(i64),
    /// Float value, possibly NaN or infinite
    #[serde(serialize_with = "serialize_float")]
    Float(f64),
    /// Text value
    Text(String),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
}

impl CoercedValue {
    /// Returns true for either missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, CoercedValue::Null | CoercedValue::Invalid)
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CoercedValue::Integer(i) => Some(*i as f64),
            CoercedValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for CoercedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CoercedValue::Null, CoercedValue::Null) => true,
            (CoercedValue::Invalid, CoercedValue::Invalid) => true,
            (CoercedValue::Integer(a), CoercedValue::Integer(b)) => a == b,
            (CoercedValue::Float(a), CoercedValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CoercedValue::Text(a), CoercedValue::Text(b)) => a == b,
            (CoercedValue::Timestamp(a), CoercedValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

/// A column of coerced values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercedColumn {
    /// Column name
    pub name: String,

    /// Logical type the values were coerced to
    pub logical_type: LogicalType,

    /// False when the column was declared but absent from the dataset
    pub present: bool,

    /// One value per row
    pub values: Vec<CoercedValue>,
}

impl CoercedColumn {
    /// Number of cells holding a valid value.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

/// The coerced copy of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercedDataSet {
    columns: Vec<CoercedColumn>,
    row_count: usize,
}

impl CoercedDataSet {
    pub(crate) fn new(columns: Vec<CoercedColumn>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == row_count));
        Self { columns, row_count }
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the columns: schema columns first in declaration order, then
    /// any passed-through extra columns.
    pub fn columns(&self) -> &[CoercedColumn] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&CoercedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets a single cell.
    pub fn value(&self, column: &str, row: usize) -> Option<&CoercedValue> {
        self.column(column).and_then(|c| c.values.get(row))
    }
}
