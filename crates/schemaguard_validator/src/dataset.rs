//! Dataset representation for validation.
//!
//! Datasets are columnar: an ordered sequence of named columns of raw cells,
//! all of the same length. The validator never mutates a dataset.

use crate::DataSetError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// A raw cell value as supplied by the extraction step.
///
/// Floats compare bitwise, so two `NaN` cells are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    #[serde(serialize_with = "serialize_float")]
    Float(f64),
    /// String value
    String(String),
}

/// Serializes a float, writing non-finite values as `"NaN"`, `"inf"` and
/// `"-inf"`.
///
/// JSON has no representation for them and `serde_json` would emit `null`,
/// which reads as a missing value.
pub(crate) fn serialize_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.collect_str(value)
    }
}

impl DataValue {
    /// Returns true if this value is null or a blank string.
    pub fn is_null(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::String(_) => "string",
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to get this value as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            DataValue::Float(f) => Some(*f),
            DataValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Null, DataValue::Null) => true,
            (DataValue::Bool(a), DataValue::Bool(b)) => a == b,
            (DataValue::Int(a), DataValue::Int(b)) => a == b,
            (DataValue::Float(a), DataValue::Float(b)) => a.to_bits() == b.to_bits(),
            (DataValue::String(a), DataValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(x) => write!(f, "{}", x),
            DataValue::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// A named column of raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Cell values, one per row
    pub values: Vec<DataValue>,
}

impl Column {
    /// Creates a column from anything convertible to raw values.
    pub fn new<V: Into<DataValue>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A row-aligned, columnar dataset.
///
/// Construction checks that all columns have the same length and that names
/// are unique, so every `DataSet` is rectangular.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    columns: Vec<Column>,
    row_count: usize,
}

impl DataSet {
    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Creates a dataset from columns.
    ///
    /// # Errors
    ///
    /// Fails if column lengths differ or a name repeats.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataSetError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataSetError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != row_count {
                return Err(DataSetError::RaggedColumn {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Returns the number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterates over column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Gets a single cell.
    pub fn value(&self, column: &str, row: usize) -> Option<&DataValue> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Returns a new dataset holding only the given rows, in the given order.
    ///
    /// Out-of-range indices are skipped. Used by callers that persist a
    /// sample of rejected rows.
    pub fn select_rows(&self, rows: &[usize]) -> DataSet {
        let rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&r| r < self.row_count)
            .collect();

        DataSet {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&r| c.values[r].clone()).collect(),
                })
                .collect(),
            row_count: rows.len(),
        }
    }

    /// Takes the first `size` rows.
    ///
    /// If `size` is greater than the number of rows, returns all rows.
    pub fn sample(&self, size: usize) -> DataSet {
        let rows: Vec<usize> = (0..size.min(self.row_count)).collect();
        self.select_rows(&rows)
    }
}

impl Default for DataSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'de> Deserialize<'de> for DataSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            columns: Vec<Column>,
        }

        let raw = Raw::deserialize(deserializer)?;
        DataSet::new(raw.columns).map_err(serde::de::Error::custom)
    }
}
