//! Validate command - check files and the request without converting.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetflow::{
    BatchOrchestrator, CsvStructureValidator, SheetflowError, ValidationReport,
    WorkbookStructureValidator,
};

use crate::cli::TargetFormat;

pub fn run(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    to: TargetFormat,
    merge: Option<String>,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = super::build_request(inputs.clone(), output_dir, to, merge);

    let mut reports: Vec<(String, ValidationReport)> = Vec::new();
    reports.push((
        "request".to_string(),
        BatchOrchestrator::new().validate_request(&request),
    ));
    for input in &inputs {
        reports.push((input.display().to_string(), structure_report(input)));
    }

    let all_valid = reports.iter().all(|(_, r)| r.is_valid);

    if json {
        let map: serde_json::Map<String, serde_json::Value> = reports
            .iter()
            .map(|(name, report)| Ok((name.clone(), serde_json::to_value(report)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        for (name, report) in &reports {
            print_report(name, report);
        }
        println!();
        if all_valid {
            println!("{}", "All checks passed.".green().bold());
        } else {
            println!("{}", "Validation failed.".red().bold());
        }
    }

    if all_valid {
        Ok(())
    } else {
        Err(Box::new(SheetflowError::Validation(
            "one or more checks failed".to_string(),
        )))
    }
}

/// Pick the structural validator from the file extension.
fn structure_report(input: &Path) -> ValidationReport {
    let is_workbook = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_lowercase().as_str(),
                "xlsx" | "xls" | "xlsm" | "xlsb" | "ods"
            )
        })
        .unwrap_or(false);
    if is_workbook {
        WorkbookStructureValidator::new().validate(input)
    } else {
        CsvStructureValidator::new().validate(input)
    }
}

fn print_report(name: &str, report: &ValidationReport) {
    println!();
    let verdict = if report.is_valid {
        "ok".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("{} {} [{}]", "Checked".cyan().bold(), name.white(), verdict);

    for error in &report.errors {
        println!("  {} {}", "error:".red(), error);
    }
    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    for (key, value) in &report.info {
        println!("  {} {} = {}", "info:".dimmed(), key, value);
    }
}
