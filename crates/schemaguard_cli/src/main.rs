mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "schemaguard")]
#[command(version, about = "SchemaGuard tabular dataset validator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a dataset against a schema
    Validate {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Path to the dataset file (JSON with a `columns` array)
        dataset: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Fail on dataset columns the schema does not declare
        #[arg(long)]
        reject_unknown: bool,

        /// Process columns in parallel
        #[arg(long)]
        parallel: bool,

        /// Dataset kind recorded in the report (e.g. train, test)
        #[arg(short, long)]
        kind: Option<String>,

        /// Number of rejected row indices to print
        #[arg(long, default_value_t = 50)]
        sample: usize,

        /// Fall back to text for unknown type tags instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Check a schema file without validating data
    Check {
        /// Path to the schema file (YAML, TOML or JSON)
        schema: String,

        /// Fall back to text for unknown type tags instead of failing
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate {
            schema,
            dataset,
            format,
            reject_unknown,
            parallel,
            kind,
            sample,
            lenient,
        } => commands::validate::execute(commands::validate::ValidateArgs {
            schema_path: &schema,
            dataset_path: &dataset,
            format,
            reject_unknown,
            parallel,
            kind,
            sample,
            lenient,
        }),

        Commands::Check { schema, lenient } => commands::check::execute(&schema, lenient),
    }
}
