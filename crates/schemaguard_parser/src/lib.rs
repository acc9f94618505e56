//! Loader for schema descriptor files (YAML/TOML/JSON formats).
//!
//! This crate reads schema files into [`SchemaDescriptor`]s and, via
//! [`load_schema`], all the way into validated [`Schema`]s. The schema path
//! is always an explicit argument.
//!
//! # Example
//!
//! ```rust
//! use schemaguard_parser::parse_yaml;
//!
//! let yaml = r#"
//! columns:
//!   - name: engine_id
//!     pandas_type: int
//!     nullable: false
//!     constraints:
//!       - name: positive
//! "#;
//!
//! let descriptor = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(descriptor.columns.len(), 1);
//! ```

use schemaguard_core::{BuilderOptions, Schema, SchemaBuildError, SchemaBuilder, SchemaDescriptor};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a schema.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Descriptor parsed but does not describe a valid schema
    #[error("Invalid schema: {0}")]
    Build(#[from] SchemaBuildError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Parse a schema descriptor from a YAML string.
pub fn parse_yaml(content: &str) -> Result<SchemaDescriptor> {
    let descriptor: SchemaDescriptor = serde_yaml_ng::from_str(content)?;
    Ok(descriptor)
}

/// Parse a schema descriptor from a TOML string.
///
/// # Example
///
/// ```rust
/// use schemaguard_parser::parse_toml;
///
/// let toml = r#"
/// [[columns]]
/// name = "sensor_1"
/// pandas_type = "float"
/// constraints = ["finite", { check = ">= 0" }]
/// "#;
///
/// let descriptor = parse_toml(toml).unwrap();
/// assert_eq!(descriptor.columns[0].name.as_deref(), Some("sensor_1"));
/// ```
pub fn parse_toml(content: &str) -> Result<SchemaDescriptor> {
    let descriptor: SchemaDescriptor =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(descriptor)
}

/// Parse a schema descriptor from a JSON string.
pub fn parse_json(content: &str) -> Result<SchemaDescriptor> {
    let descriptor: SchemaDescriptor = serde_json::from_str(content)?;
    Ok(descriptor)
}

/// Parse a descriptor string in the given format.
pub fn parse_str(content: &str, format: SchemaFormat) -> Result<SchemaDescriptor> {
    match format {
        SchemaFormat::Yaml => parse_yaml(content),
        SchemaFormat::Toml => parse_toml(content),
        SchemaFormat::Json => parse_json(content),
    }
}

/// Detect the schema format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
/// * `.json` → `SchemaFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        "json" => Ok(SchemaFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema descriptor from a file with automatic format detection.
pub fn parse_file(path: &Path) -> Result<SchemaDescriptor> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// Load and build a schema from a file.
///
/// # Example
///
/// ```no_run
/// use schemaguard_core::BuilderOptions;
/// use schemaguard_parser::load_schema;
/// use std::path::Path;
///
/// let schema = load_schema(Path::new("schemas/telemetry.yml"), BuilderOptions::default()).unwrap();
/// println!("Loaded {} columns", schema.len());
/// ```
pub fn load_schema(path: &Path, options: BuilderOptions) -> Result<Schema> {
    let descriptor = parse_file(path)?;
    let schema = SchemaBuilder::with_options(options).build(&descriptor)?;
    info!(path = %path.display(), columns = schema.len(), "schema loaded");
    Ok(schema)
}
