use anyhow::{Context, Result};
use schemaguard_core::{BuilderOptions, SchemaBuilder};
use schemaguard_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(schema_path: &str, lenient: bool) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    let path = Path::new(schema_path);
    let descriptor = parse_file(path)
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    let options = BuilderOptions::new().with_strict_types(!lenient);
    let schema = SchemaBuilder::with_options(options)
        .build(&descriptor)
        .with_context(|| format!("Invalid schema: {}", schema_path))?;

    output::print_success("Schema is valid");

    println!("\nSchema Summary:");
    println!(
        "  Name:        {}",
        descriptor.name.as_deref().unwrap_or("N/A")
    );
    println!("  Columns:     {}", schema.len());
    println!("  Constraints: {}", schema.constraint_count());

    println!("\nColumns:");
    for column in schema.columns() {
        let constraints = column
            .constraints
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<20} {:<10} {:<9} {}",
            column.name,
            column.logical_type.to_string(),
            if column.nullable { "nullable" } else { "required" },
            constraints
        );
    }

    Ok(())
}
