//! Schema descriptor types.
//!
//! A descriptor is the already-parsed, untyped form of a schema file. It is
//! deliberately permissive (every field optional) so that structural problems
//! surface as [`SchemaBuildError`](crate::SchemaBuildError)s from the builder
//! rather than as opaque deserialization errors.
//!
//! ```yaml
//! columns:
//!   - name: cycle_number
//!     pandas_type: int
//!     nullable: false
//!     constraints:
//!       - name: positive
//!   - name: sensor_1
//!     pandas_type: float
//!     constraints:
//!       - finite
//!       - check: ">= 0"
//! ```

use crate::ConstraintDescriptor;
use serde::{Deserialize, Serialize};

/// Top-level schema descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Optional schema name, used for logging only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Column definitions in order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

/// Descriptor of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name (required by the builder)
    #[serde(default)]
    pub name: Option<String>,

    /// Type tag, e.g. `int`, `float`, `object`, `datetime`
    #[serde(default, alias = "type", alias = "logical_type")]
    pub pandas_type: Option<String>,

    /// Whether nulls are allowed (defaults to true)
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Constraint descriptors
    #[serde(default)]
    pub constraints: Option<Vec<ConstraintDescriptor>>,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a descriptor with a name and type tag.
    pub fn new(name: impl Into<String>, pandas_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            pandas_type: Some(pandas_type.into()),
            nullable: true,
            constraints: None,
            description: None,
        }
    }

    /// Sets nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Appends a constraint descriptor.
    pub fn constraint(mut self, constraint: impl Into<ConstraintDescriptor>) -> Self {
        self.constraints
            .get_or_insert_with(Vec::new)
            .push(constraint.into());
        self
    }
}

fn default_nullable() -> bool {
    true
}
