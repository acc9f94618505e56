//! Integration tests for the validation engine.
//!
//! These tests run end-to-end validation of engine telemetry datasets against
//! a schema built from a descriptor, the same path the CLI takes.

use pretty_assertions::assert_eq;
use schemaguard_core::{
    ColumnDescriptor, Constraint, Schema, SchemaBuilder, SchemaDescriptor, ValidationContext,
};
use schemaguard_validator::{
    CoercedValue, CoercionReason, Column, DataSet, DataValue, SchemaValidator, UnknownColumnPolicy,
    ValidationOptions,
};

/// Creates a turbofan telemetry schema similar to the ones used for training
/// remaining-useful-life models.
fn create_telemetry_schema() -> Schema {
    let descriptor = SchemaDescriptor {
        name: Some("engine_telemetry".to_string()),
        columns: vec![
            ColumnDescriptor::new("engine_id", "int")
                .nullable(false)
                .constraint("positive"),
            ColumnDescriptor::new("cycle_number", "int")
                .nullable(false)
                .constraint(">= 1"),
            ColumnDescriptor::new("op_setting_1", "float").constraint("finite"),
            ColumnDescriptor::new("sensor_1", "float").constraint("finite"),
            ColumnDescriptor::new("sensor_2", "float")
                .constraint("finite")
                .constraint(">= 0"),
            ColumnDescriptor::new("recorded_at", "datetime"),
        ],
    };

    SchemaBuilder::new().build(&descriptor).unwrap()
}

fn create_valid_dataset(rows: usize) -> DataSet {
    let engine_ids: Vec<i64> = (0..rows).map(|i| (i / 10 + 1) as i64).collect();
    let cycles: Vec<i64> = (0..rows).map(|i| (i % 10 + 1) as i64).collect();
    let settings: Vec<f64> = (0..rows).map(|i| -0.0007 + i as f64 * 1e-5).collect();
    let sensor_1: Vec<f64> = (0..rows).map(|_| 518.67).collect();
    let sensor_2: Vec<f64> = (0..rows).map(|i| 641.82 + (i % 7) as f64 * 0.1).collect();
    let recorded_at: Vec<String> = (0..rows)
        .map(|i| format!("2024-01-{:02}T00:00:00Z", i % 28 + 1))
        .collect();

    DataSet::new(vec![
        Column::new("engine_id", engine_ids),
        Column::new("cycle_number", cycles),
        Column::new("op_setting_1", settings),
        Column::new("sensor_1", sensor_1),
        Column::new("sensor_2", sensor_2),
        Column::new("recorded_at", recorded_at),
    ])
    .unwrap()
}

#[test]
fn test_valid_telemetry_dataset() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(100);
    let context = ValidationContext::new().with_dataset_kind("train");

    let report = SchemaValidator::new().validate(&schema, &dataset, &context);

    assert!(
        report.passed(),
        "Expected validation to pass, but got: {:?} {:?}",
        report.coercion_failures(),
        report.constraint_failures()
    );
    assert_eq!(report.stats().records_validated, 100);
    assert_eq!(report.stats().columns_checked, 6);
    assert_eq!(report.context().dataset_kind.as_deref(), Some("train"));

    let coerced = report.coerced_dataset().unwrap();
    assert_eq!(coerced.row_count(), 100);
    assert!(matches!(
        coerced.value("recorded_at", 0),
        Some(CoercedValue::Timestamp(_))
    ));
}

#[test]
fn test_cycle_number_end_to_end() {
    let schema = SchemaBuilder::new()
        .build(&SchemaDescriptor {
            name: None,
            columns: vec![
                ColumnDescriptor::new("cycle_number", "int")
                    .nullable(false)
                    .constraint(">= 1"),
            ],
        })
        .unwrap();
    let dataset = DataSet::new(vec![Column::new("cycle_number", [1i64, 0, -5, 3])]).unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert!(!report.passed());
    assert!(report.coercion_failures().is_empty());

    let failures: Vec<(usize, DataValue)> = report
        .constraint_failures()
        .iter()
        .map(|f| (f.row_index, f.observed_value.clone()))
        .collect();
    assert_eq!(failures, vec![(1, DataValue::Int(0)), (2, DataValue::Int(-5))]);
    assert!(
        report
            .constraint_failures()
            .iter()
            .all(|f| f.constraint == Constraint::GreaterEqual(1.0))
    );
}

#[test]
fn test_missing_sensor_column() {
    let schema = create_telemetry_schema();
    let full = create_valid_dataset(5);
    let columns: Vec<Column> = full
        .columns()
        .iter()
        .filter(|c| c.name != "sensor_1")
        .cloned()
        .collect();
    let dataset = DataSet::new(columns).unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert!(!report.passed());
    assert_eq!(report.coercion_failures().len(), 1);
    let failure = &report.coercion_failures()[0];
    assert_eq!(failure.column_name, "sensor_1");
    assert_eq!(failure.row_index, None);
    assert_eq!(failure.reason, CoercionReason::ColumnMissing);
    assert!(report.constraint_failures().is_empty());
}

#[test]
fn test_positive_accepts_one_rejects_zero() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(3);
    let mut columns = dataset.columns().to_vec();
    columns[0] = Column::new("engine_id", [0i64, 1, 2]);
    let dataset = DataSet::new(columns).unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert_eq!(report.constraint_failures().len(), 1);
    let failure = &report.constraint_failures()[0];
    assert_eq!(failure.column_name, "engine_id");
    assert_eq!(failure.row_index, 0);
    assert_eq!(failure.constraint, Constraint::GreaterEqual(1.0));
}

#[test]
fn test_non_finite_sensor_readings() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(4);
    let mut columns = dataset.columns().to_vec();
    columns[3] = Column::new(
        "sensor_1",
        vec![
            DataValue::Float(518.67),
            DataValue::Float(f64::NAN),
            DataValue::Float(f64::INFINITY),
            DataValue::Null,
        ],
    );
    let dataset = DataSet::new(columns).unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert!(report.coercion_failures().is_empty());
    let rows: Vec<usize> = report
        .constraint_failures()
        .iter()
        .map(|f| f.row_index)
        .collect();
    assert_eq!(rows, vec![1, 2]);
}

#[test]
fn test_string_cells_are_coerced() {
    let schema = create_telemetry_schema();
    let dataset = DataSet::new(vec![
        Column::new("engine_id", ["1", "2"]),
        Column::new("cycle_number", ["1", "x"]),
        Column::new("op_setting_1", ["0.0023", "-0.0019"]),
        Column::new("sensor_1", ["518.67", "NaN"]),
        Column::new("sensor_2", ["641.82", "642.15"]),
        Column::new("recorded_at", ["2024-01-01", "2024-01-01 06:00:00"]),
    ])
    .unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert_eq!(report.coercion_failures().len(), 1);
    assert_eq!(report.coercion_failures()[0].column_name, "cycle_number");
    assert_eq!(report.coercion_failures()[0].row_index, Some(1));

    assert_eq!(report.constraint_failures().len(), 1);
    assert_eq!(report.constraint_failures()[0].column_name, "sensor_1");
    assert_eq!(
        report.constraint_failures()[0].observed_value,
        DataValue::from("NaN")
    );
    assert_eq!(report.rejected_rows(), vec![1]);
}

#[test]
fn test_validation_is_idempotent() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(20);
    let mut columns = dataset.columns().to_vec();
    columns[1] = Column::new("cycle_number", (0..20).map(|i| i as i64 - 3));
    let dataset = DataSet::new(columns).unwrap();
    let context = ValidationContext::new().with_metadata("source", "unit-test");
    let validator = SchemaValidator::new();

    let first = validator.validate(&schema, &dataset, &context);
    let second = validator.validate(&schema, &dataset, &context);

    assert!(!first.passed());
    assert_eq!(first, second);
}

#[test]
fn test_extra_columns_policy() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(2);
    let mut columns = dataset.columns().to_vec();
    columns.push(Column::new("sensor_22", [1.0, 2.0]));
    let dataset = DataSet::new(columns).unwrap();

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());
    assert!(report.passed());
    assert_eq!(
        report.coerced_dataset().unwrap().columns().last().unwrap().name,
        "sensor_22"
    );

    let strict = SchemaValidator::with_options(
        ValidationOptions::new().with_unknown_columns(UnknownColumnPolicy::Reject),
    );
    let report = strict.validate(&schema, &dataset, &ValidationContext::new());
    assert!(!report.passed());
    assert_eq!(
        report.coercion_failures()[0].reason,
        CoercionReason::UnexpectedColumn
    );
}

#[test]
fn test_sample_size_validation() {
    let schema = create_telemetry_schema();
    let dataset = create_valid_dataset(100).sample(10);

    let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());

    assert!(report.passed());
    assert_eq!(report.stats().records_validated, 10);
}
