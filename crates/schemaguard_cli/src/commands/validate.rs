use anyhow::{Context, Result};
use schemaguard_core::{BuilderOptions, ValidationContext};
use schemaguard_parser::load_schema;
use schemaguard_validator::{
    DataSet, SchemaValidator, UnknownColumnPolicy, ValidationOptions,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::OutputFormat;
use crate::output;

pub struct ValidateArgs<'a> {
    pub schema_path: &'a str,
    pub dataset_path: &'a str,
    pub format: OutputFormat,
    pub reject_unknown: bool,
    pub parallel: bool,
    pub kind: Option<String>,
    pub sample: usize,
    pub lenient: bool,
}

pub fn execute(args: ValidateArgs<'_>) -> Result<()> {
    info!("Validating dataset: {}", args.dataset_path);
    info!("Schema: {}", args.schema_path);

    let builder_options = BuilderOptions::new().with_strict_types(!args.lenient);
    let schema = load_schema(Path::new(args.schema_path), builder_options)
        .with_context(|| format!("Failed to load schema file: {}", args.schema_path))?;

    let (dataset, file_kind) = load_dataset(Path::new(args.dataset_path))?;

    let mut context = ValidationContext::new()
        .with_metadata("schema", args.schema_path)
        .with_metadata("dataset", args.dataset_path);
    if let Some(kind) = args.kind.or(file_kind) {
        context = context.with_dataset_kind(kind);
    }

    let policy = if args.reject_unknown {
        UnknownColumnPolicy::Reject
    } else {
        UnknownColumnPolicy::Ignore
    };
    let options = ValidationOptions::new()
        .with_unknown_columns(policy)
        .with_parallel(args.parallel)
        .with_include_coerced(false);

    let report = SchemaValidator::with_options(options).validate(&schema, &dataset, &context);

    output::print_validation_report(&report, args.format, args.sample)?;

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}

/// Reads a dataset JSON file, returning the dataset and its optional `kind` tag.
fn load_dataset(path: &Path) -> Result<(DataSet, Option<String>)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;

    let kind = value.get("kind").and_then(Value::as_str).map(String::from);
    let dataset: DataSet = serde_json::from_value(value)
        .with_context(|| format!("Invalid dataset in file: {}", path.display()))?;

    info!(
        rows = dataset.row_count(),
        columns = dataset.columns().len(),
        "dataset loaded"
    );
    Ok((dataset, kind))
}
