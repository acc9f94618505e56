//! Error types for dataset construction.
//!
//! Validation itself never fails: every data problem is recorded in the
//! report. The only errors in this crate are raised when a dataset cannot be
//! assembled into a rectangular shape in the first place.

use thiserror::Error;

/// Errors raised while assembling a [`DataSet`](crate::DataSet).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataSetError {
    /// Column length differs from the first column
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column name appears more than once
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}
