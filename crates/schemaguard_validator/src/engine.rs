//! Main validation engine.
//!
//! [`SchemaValidator`] runs coercion and constraint evaluation column by
//! column and aggregates the results into a [`ValidationReport`]. Columns are
//! independent, so with [`ValidationOptions::parallel`] they are processed on
//! scoped worker threads; results are re-assembled in schema order, making
//! parallel output identical to sequential output.

use crate::coercion::handle_unknown_columns;
use crate::{
    CoercedColumn, CoercedDataSet, CoercionFailure, ConstraintFailure, DataSet, ValidationReport,
    ValidationStats, coerce_column, evaluate_column,
};
use schemaguard_core::{ColumnSpec, Schema, ValidationContext};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// What to do with dataset columns the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownColumnPolicy {
    /// Pass them through to the coerced dataset as text
    #[default]
    Ignore,
    /// Record one `unexpected column` failure per column
    Reject,
}

/// Options for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Handling of undeclared columns
    pub unknown_columns: UnknownColumnPolicy,

    /// Process columns on worker threads
    pub parallel: bool,

    /// Keep the coerced dataset in the report
    pub include_coerced: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            unknown_columns: UnknownColumnPolicy::Ignore,
            parallel: false,
            include_coerced: true,
        }
    }
}

impl ValidationOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unknown-column policy.
    pub fn with_unknown_columns(mut self, policy: UnknownColumnPolicy) -> Self {
        self.unknown_columns = policy;
        self
    }

    /// Enables or disables per-column parallelism.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets whether the coerced dataset is kept in the report.
    pub fn with_include_coerced(mut self, include: bool) -> Self {
        self.include_coerced = include;
        self
    }
}

/// Coercion and evaluation results for one schema column.
struct ColumnOutcome {
    column: CoercedColumn,
    coercion_failures: Vec<CoercionFailure>,
    constraint_failures: Vec<ConstraintFailure>,
}

/// Validation engine for tabular datasets.
///
/// Holds only options, so one validator can be shared across threads and
/// reused for any number of (schema, dataset) pairs.
///
/// # Example
///
/// ```rust
/// use schemaguard_core::{ColumnBuilder, Constraint, LogicalType, Schema, ValidationContext};
/// use schemaguard_validator::{Column, DataSet, SchemaValidator};
///
/// let schema = Schema::new(vec![
///     ColumnBuilder::new("cycle_number", LogicalType::Integer)
///         .nullable(false)
///         .constraint(Constraint::GreaterEqual(1.0))
///         .build(),
/// ])
/// .unwrap();
///
/// let dataset = DataSet::new(vec![Column::new("cycle_number", [1i64, 0, -5, 3])]).unwrap();
///
/// let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());
///
/// assert!(!report.passed());
/// for failure in report.constraint_failures() {
///     println!("{}", failure);
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct SchemaValidator {
    options: ValidationOptions,
}

impl SchemaValidator {
    /// Creates a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given options.
    pub fn with_options(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Returns the validator options.
    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validates a dataset against a schema.
    ///
    /// Never fails: every data problem ends up in the returned report.
    pub fn validate(
        &self,
        schema: &Schema,
        dataset: &DataSet,
        context: &ValidationContext,
    ) -> ValidationReport {
        let start = Instant::now();
        info!(
            kind = context.dataset_kind.as_deref().unwrap_or("unspecified"),
            rows = dataset.row_count(),
            columns = schema.len(),
            parallel = self.options.parallel,
            "validating dataset"
        );

        let outcomes = if self.options.parallel {
            self.validate_columns_parallel(schema, dataset)
        } else {
            schema
                .columns()
                .iter()
                .map(|spec| validate_column(spec, dataset))
                .collect()
        };

        let stats = ValidationStats {
            records_validated: dataset.row_count(),
            columns_checked: schema.len(),
            constraints_evaluated: schema
                .columns()
                .iter()
                .filter(|spec| dataset.column(&spec.name).is_some())
                .map(|spec| spec.constraints.len() * dataset.row_count())
                .sum(),
        };

        let mut columns = Vec::with_capacity(outcomes.len());
        let mut coercion_failures = Vec::new();
        let mut constraint_failures = Vec::new();
        for outcome in outcomes {
            columns.push(outcome.column);
            coercion_failures.extend(outcome.coercion_failures);
            constraint_failures.extend(outcome.constraint_failures);
        }

        let (extra, extra_failures) =
            handle_unknown_columns(dataset, schema, self.options.unknown_columns);
        columns.extend(extra);
        coercion_failures.extend(extra_failures);

        let coerced = self
            .options
            .include_coerced
            .then(|| CoercedDataSet::new(columns, dataset.row_count()));

        let report = ValidationReport::aggregate(coercion_failures, constraint_failures, coerced)
            .with_stats(stats)
            .with_context(context.clone());

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            passed = report.passed(),
            "validation finished"
        );
        report
    }

    fn validate_columns_parallel(&self, schema: &Schema, dataset: &DataSet) -> Vec<ColumnOutcome> {
        if schema.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(schema.len());
        let chunk_size = schema.len().div_ceil(workers);

        let mut outcomes: Vec<(usize, ColumnOutcome)> = thread::scope(|scope| {
            let handles: Vec<_> = schema
                .columns()
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk, specs)| {
                    scope.spawn(move || {
                        specs
                            .iter()
                            .enumerate()
                            .map(|(offset, spec)| {
                                (chunk * chunk_size + offset, validate_column(spec, dataset))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        outcomes.sort_by_key(|(position, _)| *position);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

fn validate_column(spec: &ColumnSpec, dataset: &DataSet) -> ColumnOutcome {
    let raw = dataset.column(&spec.name);
    let (column, coercion_failures) = coerce_column(spec, raw, dataset.row_count());
    let constraint_failures = evaluate_column(spec, raw, &column);

    ColumnOutcome {
        column,
        coercion_failures,
        constraint_failures,
    }
}
