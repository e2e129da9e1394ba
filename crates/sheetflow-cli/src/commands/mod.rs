//! Command implementations.

pub mod convert;
pub mod estimate;
pub mod validate;

use std::path::PathBuf;

use crate::cli::TargetFormat;
use sheetflow::{ConversionRequest, OutputFormat};

/// Build a library request from command-line arguments.
pub(crate) fn build_request(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    to: TargetFormat,
    merge: Option<String>,
) -> ConversionRequest {
    let output_format = match to {
        TargetFormat::Xlsx => OutputFormat::Workbook,
        TargetFormat::Csv => OutputFormat::Csv,
    };
    let mut request = ConversionRequest::new(inputs, output_format, output_dir);
    request.merged_workbook = merge;
    request
}
