//! Constraint evaluation.
//!
//! Each constraint is applied to a whole coerced column at once, producing a
//! violation mask; masks are then merged row by row so failures come out in
//! row-major, constraint-order sequence within a column.
//!
//! Cells without a valid value are not re-flagged here. `Invalid` cells and
//! nulls in non-nullable columns were already reported by coercion, and
//! nulls in nullable columns are allowed, except by `NotNull`, whose only job
//! is to reject them.

use crate::{CoercedColumn, CoercedDataSet, CoercedValue, Column, DataSet, DataValue};
use schemaguard_core::{ColumnSpec, Constraint, Schema};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// A cell that violated a constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintFailure {
    /// Row of the failing cell
    pub row_index: usize,

    /// Column name
    pub column_name: String,

    /// The violated constraint
    pub constraint: Constraint,

    /// The raw cell value, before coercion
    pub observed_value: DataValue,
}

impl fmt::Display for ConstraintFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column '{}', row {}: value {} violates '{}'",
            self.column_name, self.row_index, self.observed_value, self.constraint
        )
    }
}

/// Evaluates every schema column's constraints.
///
/// Failures are ordered column-major (schema order), then by row, then by
/// constraint order.
pub fn evaluate(dataset: &DataSet, coerced: &CoercedDataSet, schema: &Schema) -> Vec<ConstraintFailure> {
    schema
        .columns()
        .iter()
        .filter_map(|spec| {
            coerced
                .column(&spec.name)
                .map(|column| evaluate_column(spec, dataset.column(&spec.name), column))
        })
        .flatten()
        .collect()
}

/// Evaluates one column's constraints.
///
/// `raw` supplies the observed values for the report; a column that was
/// absent from the dataset yields no failures.
pub fn evaluate_column(
    spec: &ColumnSpec,
    raw: Option<&Column>,
    coerced: &CoercedColumn,
) -> Vec<ConstraintFailure> {
    let Some(raw) = raw.filter(|_| coerced.present) else {
        return Vec::new();
    };

    let masks: Vec<Vec<bool>> = spec
        .constraints
        .iter()
        .map(|constraint| violation_mask(constraint, spec.nullable, &coerced.values))
        .collect();

    let mut failures = Vec::new();
    for row in 0..coerced.values.len() {
        for (constraint, mask) in spec.constraints.iter().zip(&masks) {
            if mask[row] {
                failures.push(ConstraintFailure {
                    row_index: row,
                    column_name: spec.name.clone(),
                    constraint: *constraint,
                    observed_value: raw.values.get(row).cloned().unwrap_or(DataValue::Null),
                });
            }
        }
    }

    debug!(
        column = %spec.name,
        constraints = spec.constraints.len(),
        failures = failures.len(),
        "column evaluated"
    );
    failures
}

/// Applies one constraint to a column; `true` marks a violation.
fn violation_mask(constraint: &Constraint, nullable: bool, values: &[CoercedValue]) -> Vec<bool> {
    values
        .iter()
        .map(|value| match value {
            CoercedValue::Invalid => false,
            CoercedValue::Null => nullable && matches!(constraint, Constraint::NotNull),
            CoercedValue::Integer(i) => !constraint.accepts_integer(*i),
            other => other.as_f64().is_some_and(|v| !constraint.accepts(v)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UnknownColumnPolicy, coerce};
    use pretty_assertions::assert_eq;
    use schemaguard_core::{ColumnBuilder, LogicalType};

    fn run(spec: ColumnSpec, values: Vec<DataValue>) -> Vec<ConstraintFailure> {
        let name = spec.name.clone();
        let schema = Schema::new(vec![spec]).unwrap();
        let dataset = DataSet::new(vec![Column::new(name, values)]).unwrap();
        let coercion = coerce(&dataset, &schema, UnknownColumnPolicy::Ignore);
        evaluate(&dataset, &coercion.dataset, &schema)
    }

    fn rows(failures: &[ConstraintFailure]) -> Vec<usize> {
        failures.iter().map(|f| f.row_index).collect()
    }

    #[test]
    fn test_greater_equal_one() {
        let spec = ColumnBuilder::new("cycle_number", LogicalType::Integer)
            .constraint(Constraint::GreaterEqual(1.0))
            .build();

        let failures = run(spec, vec![DataValue::Int(0), DataValue::Int(1)]);
        assert_eq!(rows(&failures), vec![0]);
        assert_eq!(failures[0].observed_value, DataValue::Int(0));
    }

    #[test]
    fn test_finite_rejects_nan_and_infinity_but_not_null() {
        let spec = ColumnBuilder::new("sensor_1", LogicalType::Float)
            .nullable(true)
            .constraint(Constraint::Finite)
            .build();

        let failures = run(
            spec,
            vec![
                DataValue::Float(1.5),
                DataValue::Float(f64::NAN),
                DataValue::Float(f64::INFINITY),
                DataValue::Null,
            ],
        );
        assert_eq!(rows(&failures), vec![1, 2]);
    }

    #[test]
    fn test_observed_value_is_raw() {
        let spec = ColumnBuilder::new("rul", LogicalType::Float)
            .constraint(Constraint::GreaterEqual(0.0))
            .build();

        let failures = run(spec, vec![DataValue::from(" -4.5 ")]);
        assert_eq!(failures[0].observed_value, DataValue::from(" -4.5 "));
    }

    #[test]
    fn test_multiple_constraints_no_short_circuit() {
        let spec = ColumnBuilder::new("sensor_2", LogicalType::Float)
            .constraint(Constraint::GreaterThan(0.0))
            .constraint(Constraint::LessThan(-1.0))
            .build();

        let failures = run(spec, vec![DataValue::Float(-0.5), DataValue::Float(5.0)]);

        let seen: Vec<(usize, Constraint)> =
            failures.iter().map(|f| (f.row_index, f.constraint)).collect();
        assert_eq!(
            seen,
            vec![
                (0, Constraint::GreaterThan(0.0)),
                (0, Constraint::LessThan(-1.0)),
                (1, Constraint::LessThan(-1.0)),
            ]
        );

        let spec = ColumnBuilder::new("sensor_3", LogicalType::Float)
            .constraint(Constraint::GreaterEqual(10.0))
            .constraint(Constraint::Finite)
            .build();
        let failures = run(spec, vec![DataValue::Float(f64::NEG_INFINITY)]);
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let spec = ColumnBuilder::new("event_counter", LogicalType::Integer)
            .constraint(Constraint::LessEqual(9_007_199_254_740_992.0))
            .build();

        let failures = run(
            spec,
            vec![
                DataValue::Int(9_007_199_254_740_992),
                DataValue::Int(9_007_199_254_740_993),
            ],
        );
        assert_eq!(rows(&failures), vec![1]);
        assert_eq!(failures[0].observed_value, DataValue::Int(9_007_199_254_740_993));
    }

    #[test]
    fn test_invalid_cells_not_reflagged() {
        let spec = ColumnBuilder::new("cycle_number", LogicalType::Integer)
            .constraint(Constraint::GreaterEqual(1.0))
            .build();

        let failures = run(spec, vec![DataValue::from("abc"), DataValue::Int(2)]);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_null_in_required_column_not_reflagged() {
        let spec = ColumnBuilder::new("engine_id", LogicalType::Integer)
            .nullable(false)
            .constraint(Constraint::GreaterEqual(1.0))
            .constraint(Constraint::NotNull)
            .build();

        let failures = run(spec, vec![DataValue::Null]);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_not_null_flags_nulls_in_nullable_column() {
        let spec = ColumnBuilder::new("ingested_at", LogicalType::Timestamp)
            .nullable(true)
            .constraint(Constraint::NotNull)
            .build();

        let failures = run(
            spec,
            vec![DataValue::from("2024-01-01T00:00:00Z"), DataValue::Null],
        );
        assert_eq!(rows(&failures), vec![1]);
        assert_eq!(failures[0].constraint, Constraint::NotNull);
    }

    #[test]
    fn test_absent_column_yields_no_failures() {
        let schema = Schema::new(vec![
            ColumnBuilder::new("sensor_1", LogicalType::Float)
                .constraint(Constraint::NotNull)
                .build(),
        ])
        .unwrap();
        let dataset = DataSet::new(vec![Column::new("engine_id", [1i64, 2])]).unwrap();
        let coercion = coerce(&dataset, &schema, UnknownColumnPolicy::Ignore);

        assert!(evaluate(&dataset, &coercion.dataset, &schema).is_empty());
    }

    #[test]
    fn test_failure_display() {
        let failure = ConstraintFailure {
            row_index: 2,
            column_name: "cycle_number".to_string(),
            constraint: Constraint::GreaterEqual(1.0),
            observed_value: DataValue::Int(-5),
        };
        assert_eq!(
            failure.to_string(),
            "column 'cycle_number', row 2: value -5 violates '>= 1'"
        );
    }
}
