use anyhow::Result;
use colored::*;
use schemaguard_validator::ValidationReport;
use serde_json::json;

use crate::OutputFormat;

pub fn print_validation_report(
    report: &ValidationReport,
    format: OutputFormat,
    sample: usize,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_report(report, sample),
        OutputFormat::Text => {
            print_text_report(report, sample);
            Ok(())
        }
    }
}

fn print_text_report(report: &ValidationReport, sample: usize) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    if let Some(kind) = &report.context().dataset_kind {
        println!("  Dataset kind: {}", kind);
    }

    if report.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    if !report.coercion_failures().is_empty() {
        println!("\n{}", "Coercion failures:".red().bold());
        for (i, failure) in report.coercion_failures().iter().enumerate() {
            println!("  {}. {}", i + 1, failure.to_string().red());
        }
    }

    if !report.constraint_failures().is_empty() {
        println!("\n{}", "Constraint failures:".red().bold());
        for (i, failure) in report.constraint_failures().iter().enumerate() {
            println!("  {}. {}", i + 1, failure.to_string().red());
        }
    }

    let rejected = report.rejected_rows();
    if !rejected.is_empty() && sample > 0 {
        let shown = &rejected[..rejected.len().min(sample)];
        println!(
            "\n{} {}",
            "Rejected rows:".yellow().bold(),
            shown
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let stats = report.stats();
    println!("\n{}", "Summary:".bold());
    println!("  Records validated:     {}", stats.records_validated);
    println!("  Columns checked:       {}", stats.columns_checked);
    println!("  Constraints evaluated: {}", stats.constraints_evaluated);
    println!("  Coercion failures:     {}", report.coercion_failures().len());
    println!("  Constraint failures:   {}", report.constraint_failures().len());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &ValidationReport, sample: usize) -> Result<()> {
    let rejected = report.rejected_rows();
    let output = json!({
        "report": report,
        "rejected_rows": &rejected[..rejected.len().min(sample)],
        "summary": {
            "coercion_failure_count": report.coercion_failures().len(),
            "constraint_failure_count": report.constraint_failures().len(),
            "rejected_row_count": rejected.len(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
