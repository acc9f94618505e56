//! Schema types.
//!
//! A [`Schema`] is an ordered, immutable set of [`ColumnSpec`]s with unique
//! names. It is `Send + Sync` and can be shared read-only across concurrent
//! validations.

use crate::{Constraint, Result, SchemaBuildError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The semantic type a column is declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// 64-bit signed integers
    Integer,
    /// 64-bit floating point, NaN and infinities included
    Float,
    /// Free text
    Text,
    /// Points in time, normalized to UTC
    Timestamp,
}

impl LogicalType {
    /// Resolves a descriptor type tag (case-insensitive).
    ///
    /// Accepts the pandas-style tags used by existing schema files as well as
    /// the logical type names themselves.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16"
            | "uint32" | "uint64" => Some(LogicalType::Integer),
            "float" | "float16" | "float32" | "float64" | "double" | "number" => {
                Some(LogicalType::Float)
            }
            "object" | "str" | "string" | "text" => Some(LogicalType::Text),
            "datetime" | "datetime64" | "datetime64[ns]" | "timestamp" => {
                Some(LogicalType::Timestamp)
            }
            _ => None,
        }
    }

    /// Returns true for `Integer` and `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, LogicalType::Integer | LogicalType::Float)
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::Text => "text",
            LogicalType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Definition of a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Declared logical type
    pub logical_type: LogicalType,

    /// Whether the column may contain nulls
    pub nullable: bool,

    /// Constraints, evaluated independently in this order
    pub constraints: Vec<Constraint>,

    /// Optional human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An ordered mapping from column name to [`ColumnSpec`].
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates a schema from column specs, keeping their order.
    ///
    /// # Errors
    ///
    /// Fails if a name is blank, a name repeats, or a constraint does not
    /// support the column's logical type.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(SchemaBuildError::MissingName(position));
            }

            if index.insert(column.name.clone(), position).is_some() {
                return Err(SchemaBuildError::DuplicateColumn(column.name.clone()));
            }

            if let Some(constraint) = column
                .constraints
                .iter()
                .find(|c| !c.supports(column.logical_type))
            {
                return Err(SchemaBuildError::IncompatibleConstraint {
                    column: column.name.clone(),
                    constraint: constraint.to_string(),
                    logical_type: column.logical_type.to_string(),
                });
            }
        }

        Ok(Self { columns, index })
    }

    /// Returns the columns in declaration order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Returns the declaration position of a column.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total number of constraints across all columns.
    pub fn constraint_count(&self) -> usize {
        self.columns.iter().map(|c| c.constraints.len()).sum()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}
