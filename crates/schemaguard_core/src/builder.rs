//! Builders for schemas and column specs.
//!
//! [`SchemaBuilder`] turns a [`SchemaDescriptor`] into a validated
//! [`Schema`]. It is pure: it never reads files and never touches data, so a
//! broken schema is rejected before any dataset is looked at.
//! [`ColumnBuilder`] offers a fluent API for constructing column specs in code.

use crate::{
    ColumnDescriptor, ColumnSpec, Constraint, LogicalType, Result, Schema, SchemaBuildError,
    SchemaDescriptor,
};
use tracing::{debug, warn};

/// Options controlling how descriptors are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Reject unrecognized type tags. When false, they fall back to `Text`
    /// with a warning.
    pub strict_types: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self { strict_types: true }
    }
}

impl BuilderOptions {
    /// Creates the default (strict) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict type tag handling.
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }
}

/// Builds a [`Schema`] from a [`SchemaDescriptor`].
///
/// # Example
///
/// ```rust
/// use schemaguard_core::{ColumnDescriptor, SchemaBuilder, SchemaDescriptor};
///
/// let descriptor = SchemaDescriptor {
///     name: None,
///     columns: vec![
///         ColumnDescriptor::new("cycle_number", "int")
///             .nullable(false)
///             .constraint("positive"),
///     ],
/// };
///
/// let schema = SchemaBuilder::new().build(&descriptor).unwrap();
/// assert_eq!(schema.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SchemaBuilder {
    options: BuilderOptions,
}

impl SchemaBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given options.
    pub fn with_options(options: BuilderOptions) -> Self {
        Self { options }
    }

    /// Returns the builder options.
    pub fn options(&self) -> BuilderOptions {
        self.options
    }

    /// Materializes a schema.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found, in column order: a
    /// missing name, an unknown type tag (strict mode), an unparseable or
    /// incompatible constraint, or a duplicate column.
    pub fn build(&self, descriptor: &SchemaDescriptor) -> Result<Schema> {
        let columns = descriptor
            .columns
            .iter()
            .enumerate()
            .map(|(position, column)| self.build_column(position, column))
            .collect::<Result<Vec<_>>>()?;

        let schema = Schema::new(columns)?;
        debug!(
            schema = descriptor.name.as_deref().unwrap_or("<unnamed>"),
            columns = schema.len(),
            constraints = schema.constraint_count(),
            "schema built"
        );
        Ok(schema)
    }

    fn build_column(&self, position: usize, column: &ColumnDescriptor) -> Result<ColumnSpec> {
        let name = column
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(SchemaBuildError::MissingName(position))?;

        let (logical_type, fell_back) = self.resolve_type(name, column.pandas_type.as_deref())?;

        let mut constraints = column
            .constraints
            .iter()
            .flatten()
            .map(|descriptor| {
                Constraint::parse(descriptor).map_err(|e| SchemaBuildError::constraint(name, e))
            })
            .collect::<Result<Vec<_>>>()?;

        // A text fallback cannot carry numeric constraints; keep the column usable.
        if fell_back {
            constraints.retain(|constraint| {
                let keep = constraint.supports(logical_type);
                if !keep {
                    warn!(column = name, %constraint, "dropping constraint on text fallback column");
                }
                keep
            });
        }

        Ok(ColumnSpec {
            name: name.to_string(),
            logical_type,
            nullable: column.nullable,
            constraints,
            description: column.description.clone(),
        })
    }

    /// Resolves a type tag; the flag is set when a lenient builder fell back to Text.
    fn resolve_type(&self, column: &str, tag: Option<&str>) -> Result<(LogicalType, bool)> {
        let Some(tag) = tag else {
            return Ok((LogicalType::Text, false));
        };

        match LogicalType::from_tag(tag) {
            Some(logical_type) => Ok((logical_type, false)),
            None if self.options.strict_types => Err(SchemaBuildError::unknown_type(column, tag)),
            None => {
                warn!(column, tag, "unrecognized type tag, treating column as text");
                Ok((LogicalType::Text, true))
            }
        }
    }
}

/// Builder for creating a [`ColumnSpec`].
///
/// # Example
///
/// ```rust
/// use schemaguard_core::{ColumnBuilder, Constraint, LogicalType};
///
/// let column = ColumnBuilder::new("cycle_number", LogicalType::Integer)
///     .nullable(false)
///     .constraint(Constraint::GreaterEqual(1.0))
///     .build();
/// ```
#[derive(Debug)]
pub struct ColumnBuilder {
    name: String,
    logical_type: LogicalType,
    nullable: bool,
    constraints: Vec<Constraint>,
    description: Option<String>,
}

impl ColumnBuilder {
    /// Creates a new nullable column builder.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: true,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Adds a constraint to the column.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the column description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the column spec.
    pub fn build(self) -> ColumnSpec {
        ColumnSpec {
            name: self.name,
            logical_type: self.logical_type,
            nullable: self.nullable,
            constraints: self.constraints,
            description: self.description,
        }
    }
}
