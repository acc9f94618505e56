//! Tests to verify correct handling of null values across coercion and
//! constraint evaluation.
//!
//! A null cell must be reported at most once:
//! - Coercion flags nulls in non-nullable columns
//! - The evaluator skips nulls, except for `not_null` on nullable columns
//! - Missing columns are reported once at column level, never per row

use pretty_assertions::assert_eq;
use schemaguard_core::{ColumnBuilder, Constraint, LogicalType, Schema, ValidationContext};
use schemaguard_validator::{CoercedValue, CoercionReason, Column, DataSet, DataValue, SchemaValidator};

fn validate(schema: &Schema, dataset: &DataSet) -> schemaguard_validator::ValidationReport {
    SchemaValidator::new().validate(schema, dataset, &ValidationContext::new())
}

#[test]
fn test_null_in_non_nullable_column_reported_once() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("engine_id", LogicalType::Integer)
            .nullable(false)
            .constraint(Constraint::GreaterEqual(1.0))
            .build(),
    ])
    .unwrap();
    let dataset = DataSet::new(vec![Column::new("engine_id", vec![DataValue::Null])]).unwrap();

    let report = validate(&schema, &dataset);

    assert!(!report.passed(), "Null in non-nullable column should fail");
    assert_eq!(report.coercion_failures().len(), 1);
    assert_eq!(
        report.coercion_failures()[0].reason,
        CoercionReason::NullNotAllowed
    );
    assert!(report.coercion_failures()[0].to_string().contains("null not allowed"));
    assert!(report.constraint_failures().is_empty());
}

#[test]
fn test_null_in_nullable_column_passes() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("sensor_1", LogicalType::Float)
            .constraint(Constraint::Finite)
            .constraint(Constraint::GreaterEqual(0.0))
            .build(),
    ])
    .unwrap();
    let dataset = DataSet::new(vec![Column::new(
        "sensor_1",
        vec![DataValue::Null, DataValue::Float(1.0)],
    )])
    .unwrap();

    let report = validate(&schema, &dataset);

    assert!(report.passed());
    assert_eq!(
        report.coerced_dataset().unwrap().value("sensor_1", 0),
        Some(&CoercedValue::Null)
    );
}

#[test]
fn test_blank_string_is_null() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("cycle_number", LogicalType::Integer)
            .nullable(false)
            .build(),
    ])
    .unwrap();
    let dataset = DataSet::new(vec![Column::new("cycle_number", ["  ", "3"])]).unwrap();

    let report = validate(&schema, &dataset);

    assert_eq!(report.coercion_failures().len(), 1);
    assert_eq!(report.coercion_failures()[0].row_index, Some(0));
    assert_eq!(
        report.coercion_failures()[0].reason,
        CoercionReason::NullNotAllowed
    );
}

#[test]
fn test_not_null_constraint_on_nullable_column() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("operator", LogicalType::Text)
            .constraint(Constraint::NotNull)
            .build(),
    ])
    .unwrap();
    let dataset = DataSet::new(vec![Column::new(
        "operator",
        vec![DataValue::from("ops"), DataValue::Null],
    )])
    .unwrap();

    let report = validate(&schema, &dataset);

    assert!(report.coercion_failures().is_empty());
    assert_eq!(report.constraint_failures().len(), 1);
    assert_eq!(report.constraint_failures()[0].row_index, 1);
    assert_eq!(report.constraint_failures()[0].constraint, Constraint::NotNull);
}

#[test]
fn test_missing_column_vs_null_column() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("sensor_1", LogicalType::Float)
            .nullable(false)
            .build(),
        ColumnBuilder::new("sensor_2", LogicalType::Float)
            .nullable(false)
            .build(),
    ])
    .unwrap();
    let dataset = DataSet::new(vec![Column::new(
        "sensor_2",
        vec![DataValue::Null, DataValue::Null],
    )])
    .unwrap();

    let report = validate(&schema, &dataset);

    let reasons: Vec<(&str, Option<usize>, &CoercionReason)> = report
        .coercion_failures()
        .iter()
        .map(|f| (f.column_name.as_str(), f.row_index, &f.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("sensor_1", None, &CoercionReason::ColumnMissing),
            ("sensor_2", Some(0), &CoercionReason::NullNotAllowed),
            ("sensor_2", Some(1), &CoercionReason::NullNotAllowed),
        ]
    );
}

#[test]
fn test_nan_is_a_value_not_a_null() {
    let schema = Schema::new(vec![
        ColumnBuilder::new("sensor_1", LogicalType::Float)
            .nullable(false)
            .build(),
    ])
    .unwrap();
    let dataset =
        DataSet::new(vec![Column::new("sensor_1", vec![DataValue::Float(f64::NAN)])]).unwrap();

    let report = validate(&schema, &dataset);

    assert!(report.passed());
}
