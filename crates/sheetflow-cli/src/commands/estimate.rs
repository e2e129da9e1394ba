//! Estimate command - project conversion time from file size.

use std::path::PathBuf;

use colored::Colorize;
use sheetflow::{PerformanceEstimator, PerformanceLevel};

pub fn run(
    inputs: Vec<PathBuf>,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let estimator = PerformanceEstimator::new();

    if json {
        let mut map = serde_json::Map::new();
        for input in &inputs {
            let estimate = estimator.estimate(input)?;
            map.insert(input.display().to_string(), serde_json::to_value(&estimate)?);
        }
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for input in &inputs {
        let estimate = estimator.estimate(input)?;
        let level = match estimate.level {
            PerformanceLevel::Fast => estimate.level.label().green(),
            PerformanceLevel::Medium => estimate.level.label().yellow(),
            PerformanceLevel::Slow => estimate.level.label().red(),
        };
        println!(
            "{} ({:.1} MiB): ~{:.0}s [{}]",
            input.display().to_string().white().bold(),
            estimate.file_size_bytes as f64 / (1024.0 * 1024.0),
            estimate.estimated_seconds,
            level
        );
        for rec in &estimate.recommendations {
            println!("  {} {}", "note:".cyan(), rec);
        }
    }

    Ok(())
}
