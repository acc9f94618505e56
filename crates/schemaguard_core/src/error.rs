//! Error types for schema construction.
//!
//! Both error types here are fatal: they are raised while a schema is being
//! built, before any data is touched. Data-quality problems are never errors,
//! they are recorded as failures in the validation report instead.

use thiserror::Error;

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaBuildError>;

/// A constraint descriptor that is not part of the constraint grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintParseError {
    /// Descriptor has neither a `name` nor a `check`
    #[error("constraint descriptor has neither a name nor a check expression")]
    Empty,

    /// Named constraint is not one of the known names
    #[error("unknown constraint name '{0}'")]
    UnknownName(String),

    /// Check expression does not match `<op> <number>` or `is not null`
    #[error("unsupported constraint expression '{0}'")]
    UnsupportedExpression(String),

    /// Comparator threshold is not a finite number
    #[error("invalid threshold '{threshold}' in expression '{expression}'")]
    InvalidThreshold {
        /// The full expression
        expression: String,
        /// The threshold text that failed to parse
        threshold: String,
    },
}

/// Errors raised while materializing a schema from a descriptor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaBuildError {
    /// Column at the given position has no name, or a blank one
    #[error("column at position {0} has no name")]
    MissingName(usize),

    /// Column name appears more than once
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Type tag is not a recognized logical type
    #[error("unrecognized type '{tag}' for column '{column}'")]
    UnknownType {
        /// Column name
        column: String,
        /// The offending type tag
        tag: String,
    },

    /// A constraint on the column failed to parse
    #[error("invalid constraint on column '{column}': {source}")]
    Constraint {
        /// Column name
        column: String,
        /// Underlying parse error
        #[source]
        source: ConstraintParseError,
    },

    /// Constraint cannot be applied to the column's logical type
    #[error("constraint '{constraint}' cannot be applied to {logical_type} column '{column}'")]
    IncompatibleConstraint {
        /// Column name
        column: String,
        /// Rendered constraint
        constraint: String,
        /// Rendered logical type
        logical_type: String,
    },
}

impl SchemaBuildError {
    /// Wraps a constraint parse error with the column it was found on.
    pub fn constraint(column: impl Into<String>, source: ConstraintParseError) -> Self {
        Self::Constraint {
            column: column.into(),
            source,
        }
    }

    /// Creates a new unknown type error.
    pub fn unknown_type(column: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnknownType {
            column: column.into(),
            tag: tag.into(),
        }
    }
}
