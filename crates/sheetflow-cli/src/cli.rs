//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sheetflow: CSV ⇄ workbook conversion with format inference
#[derive(Parser)]
#[command(name = "sheetflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Conversion target selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetFormat {
    /// CSV file(s) → xlsx workbook
    Xlsx,
    /// Workbook sheet → CSV (UTF-8 with BOM)
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one or more files
    Convert {
        /// Input file(s)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (created if missing)
        #[arg(short, long = "out-dir", default_value = ".")]
        output_dir: PathBuf,

        /// Target format
        #[arg(long, default_value = "xlsx")]
        to: TargetFormat,

        /// Sheet to extract when converting to CSV (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Merge all inputs into one workbook with this file stem
        #[arg(long, value_name = "NAME")]
        merge: Option<String>,

        /// Write plain sheets without header styling
        #[arg(long)]
        plain: bool,

        /// File size in MiB above which the streaming path is used
        #[arg(long, value_name = "MIB", default_value = "50")]
        chunk_threshold_mb: u64,

        /// Convert even when validation reports errors
        #[arg(long)]
        force: bool,

        /// Output the batch summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate files and the conversion request without converting
    Validate {
        /// Input file(s)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory the conversion would use
        #[arg(short, long = "out-dir", default_value = ".")]
        output_dir: PathBuf,

        /// Target format the conversion would use
        #[arg(long, default_value = "xlsx")]
        to: TargetFormat,

        /// Merge stem the conversion would use
        #[arg(long, value_name = "NAME")]
        merge: Option<String>,

        /// Output reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate conversion time from file size
    Estimate {
        /// Input file(s)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output estimates as JSON
        #[arg(long)]
        json: bool,
    },
}
