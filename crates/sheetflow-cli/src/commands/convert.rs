//! Convert command - run a conversion batch.

use std::path::PathBuf;

use colored::Colorize;
use sheetflow::{BatchOrchestrator, CancellationToken, SheetflowError};

use crate::cli::TargetFormat;

#[allow(clippy::too_many_arguments)]
pub fn run(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    to: TargetFormat,
    sheet: Option<String>,
    merge: Option<String>,
    plain: bool,
    chunk_threshold_mb: u64,
    force: bool,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = super::build_request(inputs, output_dir, to, merge);
    request.sheet = sheet;
    request.chunk_threshold_bytes = chunk_threshold_mb * 1024 * 1024;
    if plain {
        request.style = None;
    }

    let orchestrator = BatchOrchestrator::new();

    let report = orchestrator.validate_request(&request);
    if verbose || !report.is_valid {
        for warning in &report.warnings {
            eprintln!("{} {}", "Warning:".yellow(), warning);
        }
    }
    if !report.is_valid {
        for error in &report.errors {
            eprintln!("{} {}", "Invalid:".red(), error);
        }
        if !force {
            return Err(Box::new(SheetflowError::Validation(format!(
                "{} error(s); rerun with --force to convert anyway",
                report.errors.len()
            ))));
        }
        eprintln!("{}", "Proceeding despite validation errors (--force)".yellow());
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())?;

    let total = request.input_paths.len();
    let mut on_progress = |done: u64, _total: Option<u64>| {
        if !json {
            eprintln!("  [{}/{}] done", done, total);
        }
    };
    let summary = orchestrator.convert_batch(&request, Some(&mut on_progress), &cancel)?;

    if cancel.is_cancelled() {
        eprintln!("{}", "Cancelled; partial results follow.".yellow().bold());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return if summary.failed == 0 {
            Ok(())
        } else {
            Err(Box::new(SheetflowError::Validation(format!(
                "{} file(s) failed",
                summary.failed
            ))))
        };
    }

    println!();
    for result in &summary.results {
        if result.success {
            println!(
                "{} {} {} {} ({} rows)",
                "✓".green().bold(),
                result.input_path.display(),
                "→".dimmed(),
                result.output_path.display().to_string().white(),
                result.rows_written
            );
        } else {
            println!(
                "{} {}: {}",
                "✗".red().bold(),
                result.input_path.display(),
                result.error.as_deref().unwrap_or("unknown error").red()
            );
        }
        for warning in &result.warnings {
            println!("    {} {}", "warning:".yellow(), warning);
        }
    }
    println!();
    println!(
        "{} {}/{} succeeded ({:.0}%)",
        "Summary:".cyan().bold(),
        summary.succeeded.to_string().white().bold(),
        summary.total,
        summary.success_rate * 100.0
    );

    if summary.failed == 0 {
        Ok(())
    } else {
        Err(Box::new(SheetflowError::Validation(format!(
            "{} file(s) failed",
            summary.failed
        ))))
    }
}
