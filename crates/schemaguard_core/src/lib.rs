//! # SchemaGuard Core
//!
//! Core types for declaring what a tabular dataset must look like.
//!
//! ## Key Concepts
//!
//! - **Schema**: an ordered set of column specs with unique names
//! - **ColumnSpec**: name, logical type, nullability and constraints
//! - **Constraint**: a closed set of typed predicates (`>= n`, `finite`, ...)
//! - **SchemaDescriptor**: the untyped, already-parsed form of a schema file,
//!   turned into a `Schema` by the `SchemaBuilder`
//!
//! Schema construction fails fast: an unknown type tag or a misspelled
//! constraint is an error at build time, never silently ignored.
//!
//! ## Example
//!
//! ```rust
//! use schemaguard_core::{ColumnDescriptor, Constraint, SchemaBuilder, SchemaDescriptor};
//!
//! let descriptor = SchemaDescriptor {
//!     name: Some("telemetry".to_string()),
//!     columns: vec![
//!         ColumnDescriptor::new("cycle_number", "int")
//!             .nullable(false)
//!             .constraint("positive"),
//!     ],
//! };
//!
//! let schema = SchemaBuilder::new().build(&descriptor).unwrap();
//! let column = schema.column("cycle_number").unwrap();
//! assert_eq!(column.constraints, vec![Constraint::GreaterEqual(1.0)]);
//! ```

pub mod builder;
pub mod constraint;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod schema;

pub use builder::*;
pub use constraint::*;
pub use context::*;
pub use descriptor::*;
pub use error::*;
pub use schema::*;
