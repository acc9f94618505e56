//! # SchemaGuard Validator
//!
//! Validation engine for tabular datasets. Given a [`Schema`] and a
//! [`DataSet`], this crate:
//!
//! - Coerces every declared column to its logical type, recording one
//!   [`CoercionFailure`] per bad cell or missing column
//! - Evaluates each column's constraints against the coerced values,
//!   recording one [`ConstraintFailure`] per violating cell
//! - Aggregates both ledgers into a [`ValidationReport`] whose verdict is
//!   `passed` iff neither ledger has entries
//!
//! Validation never aborts on bad data; every problem is reported.
//!
//! ## Example
//!
//! ```rust
//! use schemaguard_core::{ColumnDescriptor, SchemaBuilder, SchemaDescriptor, ValidationContext};
//! use schemaguard_validator::{Column, DataSet, DataValue, SchemaValidator};
//!
//! let descriptor = SchemaDescriptor {
//!     name: Some("telemetry".to_string()),
//!     columns: vec![
//!         ColumnDescriptor::new("engine_id", "int64").nullable(false).constraint(">= 1"),
//!         ColumnDescriptor::new("sensor_1", "float64").constraint("finite"),
//!     ],
//! };
//! let schema = SchemaBuilder::new().build(&descriptor).unwrap();
//!
//! let dataset = DataSet::new(vec![
//!     Column::new("engine_id", [1i64, 2]),
//!     Column::new("sensor_1", vec![DataValue::Float(518.67), DataValue::Null]),
//! ])
//! .unwrap();
//!
//! let report = SchemaValidator::new().validate(&schema, &dataset, &ValidationContext::new());
//!
//! if report.passed() {
//!     println!("Validation passed!");
//! } else {
//!     for failure in report.coercion_failures() {
//!         println!("{}", failure);
//!     }
//! }
//! ```
//!
//! [`Schema`]: schemaguard_core::Schema

mod coerced;
mod coercion;
mod dataset;
mod engine;
mod error;
mod evaluation;
mod report;

pub use coerced::*;
pub use coercion::*;
pub use dataset::*;
pub use engine::*;
pub use error::*;
pub use evaluation::*;
pub use report::*;
