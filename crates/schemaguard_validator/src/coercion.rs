//! Type coercion.
//!
//! Converts raw cells to each column's declared logical type. Coercion never
//! fails as a whole: every problem becomes a [`CoercionFailure`] and the
//! affected cell becomes a missing marker, so later columns and the
//! constraint evaluator still run.

use crate::{
    CoercedColumn, CoercedDataSet, CoercedValue, Column, DataSet, DataValue, UnknownColumnPolicy,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use schemaguard_core::{ColumnSpec, LogicalType, Schema};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Naive formats tried after RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a cell or column could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoercionReason {
    /// Null in a non-nullable column
    NullNotAllowed,
    /// Declared column absent from the dataset
    ColumnMissing,
    /// Dataset column not declared by the schema (reject policy)
    UnexpectedColumn,
    /// Present value that does not convert to the logical type
    NotCoercible {
        expected: LogicalType,
        message: String,
    },
}

impl fmt::Display for CoercionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionReason::NullNotAllowed => f.write_str("null not allowed"),
            CoercionReason::ColumnMissing => f.write_str("column missing"),
            CoercionReason::UnexpectedColumn => f.write_str("unexpected column"),
            CoercionReason::NotCoercible { expected, message } => {
                write!(f, "cannot coerce to {}: {}", expected, message)
            }
        }
    }
}

/// A cell (or whole column) that failed coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionFailure {
    /// Row of the failing cell; `None` for column-level failures
    pub row_index: Option<usize>,

    /// Column name
    pub column_name: String,

    /// The raw cell (`Null` for column-level failures)
    pub raw_value: DataValue,

    /// What went wrong
    pub reason: CoercionReason,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_index {
            Some(row) => write!(
                f,
                "column '{}', row {}: {} (value {})",
                self.column_name, row, self.reason, self.raw_value
            ),
            None => write!(f, "column '{}': {}", self.column_name, self.reason),
        }
    }
}

/// Result of coercing a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    /// The coerced, row-aligned dataset
    pub dataset: CoercedDataSet,

    /// Failures in column-major, row-major order
    pub failures: Vec<CoercionFailure>,
}

/// Coerces every column of `dataset` against `schema`.
///
/// Schema columns come first in declaration order; columns the schema does
/// not declare are handled according to `unknown_columns`.
pub fn coerce(dataset: &DataSet, schema: &Schema, unknown_columns: UnknownColumnPolicy) -> Coercion {
    let row_count = dataset.row_count();
    let mut columns = Vec::with_capacity(schema.len());
    let mut failures = Vec::new();

    for spec in schema.columns() {
        let (column, column_failures) = coerce_column(spec, dataset.column(&spec.name), row_count);
        columns.push(column);
        failures.extend(column_failures);
    }

    let (extra, extra_failures) = handle_unknown_columns(dataset, schema, unknown_columns);
    columns.extend(extra);
    failures.extend(extra_failures);

    Coercion {
        dataset: CoercedDataSet::new(columns, row_count),
        failures,
    }
}

/// Coerces a single declared column.
///
/// `raw` is `None` when the dataset does not contain the column; the result
/// is then an all-`Null` column and a single `column missing` failure.
pub fn coerce_column(
    spec: &ColumnSpec,
    raw: Option<&Column>,
    row_count: usize,
) -> (CoercedColumn, Vec<CoercionFailure>) {
    let Some(raw) = raw else {
        debug!(column = %spec.name, "declared column missing from dataset");
        let column = CoercedColumn {
            name: spec.name.clone(),
            logical_type: spec.logical_type,
            present: false,
            values: vec![CoercedValue::Null; row_count],
        };
        let failure = CoercionFailure {
            row_index: None,
            column_name: spec.name.clone(),
            raw_value: DataValue::Null,
            reason: CoercionReason::ColumnMissing,
        };
        return (column, vec![failure]);
    };

    let mut failures = Vec::new();
    let values = raw
        .values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            let (coerced, reason) = coerce_cell(spec, value);
            if let Some(reason) = reason {
                failures.push(CoercionFailure {
                    row_index: Some(row),
                    column_name: spec.name.clone(),
                    raw_value: value.clone(),
                    reason,
                });
            }
            coerced
        })
        .collect();

    debug!(
        column = %spec.name,
        logical_type = %spec.logical_type,
        rows = row_count,
        failures = failures.len(),
        "column coerced"
    );

    let column = CoercedColumn {
        name: spec.name.clone(),
        logical_type: spec.logical_type,
        present: true,
        values,
    };
    (column, failures)
}

pub(crate) fn handle_unknown_columns(
    dataset: &DataSet,
    schema: &Schema,
    policy: UnknownColumnPolicy,
) -> (Vec<CoercedColumn>, Vec<CoercionFailure>) {
    let unknown = dataset.columns().iter().filter(|c| !schema.contains(&c.name));

    match policy {
        UnknownColumnPolicy::Ignore => {
            let passed_through = unknown
                .map(|column| CoercedColumn {
                    name: column.name.clone(),
                    logical_type: LogicalType::Text,
                    present: true,
                    values: column
                        .values
                        .iter()
                        .map(|v| if v.is_null() { CoercedValue::Null } else { coerce_text(v) })
                        .collect(),
                })
                .collect();
            (passed_through, Vec::new())
        }
        UnknownColumnPolicy::Reject => {
            let failures = unknown
                .map(|column| CoercionFailure {
                    row_index: None,
                    column_name: column.name.clone(),
                    raw_value: DataValue::Null,
                    reason: CoercionReason::UnexpectedColumn,
                })
                .collect();
            (Vec::new(), failures)
        }
    }
}

fn coerce_cell(spec: &ColumnSpec, value: &DataValue) -> (CoercedValue, Option<CoercionReason>) {
    if value.is_null() {
        let reason = (!spec.nullable).then_some(CoercionReason::NullNotAllowed);
        return (CoercedValue::Null, reason);
    }

    let result = match spec.logical_type {
        LogicalType::Integer => coerce_integer(value),
        LogicalType::Float => coerce_float(value),
        LogicalType::Text => Ok(coerce_text(value)),
        LogicalType::Timestamp => coerce_timestamp(value),
    };

    match result {
        Ok(coerced) => (coerced, None),
        Err(message) => (
            CoercedValue::Invalid,
            Some(CoercionReason::NotCoercible {
                expected: spec.logical_type,
                message,
            }),
        ),
    }
}

fn coerce_integer(value: &DataValue) -> Result<CoercedValue, String> {
    match value {
        DataValue::Int(i) => Ok(CoercedValue::Integer(*i)),
        DataValue::Float(f) => integral(*f)
            .map(CoercedValue::Integer)
            .ok_or_else(|| format!("{} is not an integer", f)),
        DataValue::String(s) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
                .map(CoercedValue::Integer)
                .ok_or_else(|| format!("'{}' is not an integer", text))
        }
        DataValue::Bool(_) => Err("boolean is not numeric".to_string()),
        DataValue::Null => Ok(CoercedValue::Null),
    }
}

fn coerce_float(value: &DataValue) -> Result<CoercedValue, String> {
    match value {
        DataValue::Int(i) => Ok(CoercedValue::Float(*i as f64)),
        DataValue::Float(f) => Ok(CoercedValue::Float(*f)),
        DataValue::String(s) => {
            let text = s.trim();
            text.parse::<f64>()
                .map(CoercedValue::Float)
                .map_err(|_| format!("'{}' is not a number", text))
        }
        DataValue::Bool(_) => Err("boolean is not numeric".to_string()),
        DataValue::Null => Ok(CoercedValue::Null),
    }
}

fn coerce_text(value: &DataValue) -> CoercedValue {
    match value {
        DataValue::String(s) => CoercedValue::Text(s.clone()),
        DataValue::Int(i) => CoercedValue::Text(i.to_string()),
        DataValue::Float(f) => CoercedValue::Text(f.to_string()),
        DataValue::Bool(b) => CoercedValue::Text(b.to_string()),
        DataValue::Null => CoercedValue::Null,
    }
}

fn coerce_timestamp(value: &DataValue) -> Result<CoercedValue, String> {
    match value {
        DataValue::String(s) => parse_timestamp(s.trim())
            .map(CoercedValue::Timestamp)
            .ok_or_else(|| format!("'{}' does not match any accepted timestamp format", s.trim())),
        DataValue::Int(secs) => DateTime::from_timestamp(*secs, 0)
            .map(CoercedValue::Timestamp)
            .ok_or_else(|| format!("{} is out of range for a Unix timestamp", secs)),
        DataValue::Float(_) => Err("float values cannot be read as timestamps".to_string()),
        DataValue::Bool(_) => Err("boolean values cannot be read as timestamps".to_string()),
        DataValue::Null => Ok(CoercedValue::Null),
    }
}

/// Parses a timestamp in any accepted format.
///
/// Accepts RFC 3339 (any offset, normalized to UTC), the naive formats in
/// [`NAIVE_DATETIME_FORMATS`] and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Converts a float to i64 when it is finite, integral and in range.
fn integral(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then(|| value as i64)
}
