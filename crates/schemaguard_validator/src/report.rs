//! Validation report.
//!
//! The report is the only artifact a validation run returns. Its verdict is
//! derived from the failure ledgers and cannot be set directly.

use crate::{CoercedDataSet, CoercionFailure, ConstraintFailure};
use schemaguard_core::ValidationContext;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

/// Statistics about a validation run.
///
/// Contains only deterministic counts so that repeated runs produce
/// identical reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of rows validated
    pub records_validated: usize,

    /// Number of schema columns checked
    pub columns_checked: usize,

    /// Number of (constraint, row) pairs evaluated on present columns
    pub constraints_evaluated: usize,
}

/// Outcome of validating one dataset against one schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    passed: bool,
    coercion_failures: Vec<CoercionFailure>,
    constraint_failures: Vec<ConstraintFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coerced_dataset: Option<CoercedDataSet>,
    stats: ValidationStats,
    context: ValidationContext,
}

impl ValidationReport {
    /// Aggregates failure ledgers into a report.
    ///
    /// The report passes iff both ledgers are empty.
    pub fn aggregate(
        coercion_failures: Vec<CoercionFailure>,
        constraint_failures: Vec<ConstraintFailure>,
        coerced_dataset: Option<CoercedDataSet>,
    ) -> Self {
        let passed = coercion_failures.is_empty() && constraint_failures.is_empty();
        info!(
            passed,
            coercion_failures = coercion_failures.len(),
            constraint_failures = constraint_failures.len(),
            "validation report aggregated"
        );

        Self {
            passed,
            coercion_failures,
            constraint_failures,
            coerced_dataset,
            stats: ValidationStats::default(),
            context: ValidationContext::default(),
        }
    }

    /// Attaches run statistics.
    pub fn with_stats(mut self, stats: ValidationStats) -> Self {
        self.stats = stats;
        self
    }

    /// Attaches the validation context.
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = context;
        self
    }

    /// Whether the dataset conforms to the schema.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Coercion failures, column-major then row-major.
    pub fn coercion_failures(&self) -> &[CoercionFailure] {
        &self.coercion_failures
    }

    /// Constraint failures, column-major, row-major, then constraint order.
    pub fn constraint_failures(&self) -> &[ConstraintFailure] {
        &self.constraint_failures
    }

    /// The coerced dataset, if it was kept.
    pub fn coerced_dataset(&self) -> Option<&CoercedDataSet> {
        self.coerced_dataset.as_ref()
    }

    /// Consumes the report, returning the coerced dataset.
    pub fn into_coerced_dataset(self) -> Option<CoercedDataSet> {
        self.coerced_dataset
    }

    /// Run statistics.
    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    /// The context the run was started with.
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Total number of failures of both kinds.
    pub fn failure_count(&self) -> usize {
        self.coercion_failures.len() + self.constraint_failures.len()
    }

    /// Sorted, distinct indices of rows with at least one cell-level failure.
    ///
    /// Column-level failures (missing or unexpected columns) carry no row
    /// and are not included. Callers use this to persist a sample of
    /// rejected rows, e.g. `&report.rejected_rows()[..50]`.
    pub fn rejected_rows(&self) -> Vec<usize> {
        self.coercion_failures
            .iter()
            .filter_map(|f| f.row_index)
            .chain(self.constraint_failures.iter().map(|f| f.row_index))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
