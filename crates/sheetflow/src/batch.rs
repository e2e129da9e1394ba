//! Sequential batch conversion with per-file fault isolation.
//!
//! One failing input never aborts the batch: its failure is recorded in
//! the summary and the next file is attempted. The only batch-level
//! errors are ones that make every file unprocessable (empty input list,
//! invalid configuration, unusable output directory).

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use crate::convert::{
    ChunkedConverter, ConversionPlanner, ConvertConfig, ReverseConverter, SheetNamer,
    StandardConverter, Strategy, StyleOptions,
};
use crate::error::{Result, SheetflowError};
use crate::progress::{CancellationToken, ProgressFn};
use crate::sniff::FormatSniffer;
use crate::validate::{ConflictValidator, SecurityValidator, ValidationReport};

/// Target format of a conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Workbook sheet(s) → CSV.
    Csv,
    /// CSV file(s) → xlsx workbook.
    Workbook,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Workbook => "xlsx",
        }
    }
}

/// One batch of conversions sharing a direction and output directory.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input_paths: Vec<PathBuf>,
    pub output_format: OutputFormat,
    pub output_directory: PathBuf,
    /// Header styling; `None` writes plain sheets.
    pub style: Option<StyleOptions>,
    /// File size above which the streaming path is selected.
    pub chunk_threshold_bytes: u64,
    /// Sheet to extract when the target is CSV. `None` means the first.
    pub sheet: Option<String>,
    /// When set (and the target is a workbook), every input becomes one
    /// sheet of a single workbook with this file stem.
    pub merged_workbook: Option<String>,
}

impl ConversionRequest {
    pub fn new(
        input_paths: Vec<PathBuf>,
        output_format: OutputFormat,
        output_directory: PathBuf,
    ) -> Self {
        Self {
            input_paths,
            output_format,
            output_directory,
            style: Some(StyleOptions::default()),
            chunk_threshold_bytes: crate::convert::DEFAULT_CHUNK_THRESHOLD_BYTES,
            sheet: None,
            merged_workbook: None,
        }
    }

    /// The output path one input file maps to. In merged mode every
    /// input maps to the same workbook path.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        if self.output_format == OutputFormat::Workbook {
            if let Some(merged) = &self.merged_workbook {
                return self.output_directory.join(format!("{}.xlsx", merged));
            }
        }
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        self.output_directory
            .join(format!("{}.{}", stem, self.output_format.extension()))
    }
}

/// Outcome for a single input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub rows_written: u64,
    pub warnings: Vec<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl ConversionResult {
    fn success(input: PathBuf, output: PathBuf, rows: u64, warnings: Vec<String>) -> Self {
        Self {
            input_path: input,
            output_path: output,
            rows_written: rows,
            warnings,
            success: true,
            error: None,
        }
    }

    fn failure(input: PathBuf, output: PathBuf, warnings: Vec<String>, error: String) -> Self {
        Self {
            input_path: input,
            output_path: output,
            rows_written: 0,
            warnings,
            success: false,
            error: Some(error),
        }
    }
}

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Fraction in `[0, 1]`; 0 for an empty result set.
    pub success_rate: f64,
    pub results: Vec<ConversionResult>,
}

impl BatchSummary {
    fn from_results(results: Vec<ConversionResult>) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = total - succeeded;
        let success_rate = if total == 0 {
            0.0
        } else {
            succeeded as f64 / total as f64
        };
        Self {
            total,
            succeeded,
            failed,
            success_rate,
            results,
        }
    }
}

/// Runs conversion requests file by file, in input order.
pub struct BatchOrchestrator {
    config: ConvertConfig,
}

impl BatchOrchestrator {
    pub fn new() -> Self {
        Self {
            config: ConvertConfig::default(),
        }
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Check a request without converting anything or touching the
    /// filesystem beyond reads. Hard failures mean `convert_batch` would
    /// refuse or inevitably fail; warnings are advisory.
    pub fn validate_request(&self, request: &ConversionRequest) -> ValidationReport {
        let mut report = ValidationReport::new();

        if request.input_paths.is_empty() {
            report.error("request contains no input files");
        }
        if request.chunk_threshold_bytes == 0 {
            report.error("chunk threshold must be greater than zero bytes");
        }

        let security = SecurityValidator::new();
        for input in &request.input_paths {
            if !input.is_file() {
                report.error(format!("input is not a readable file: '{}'", input.display()));
                continue;
            }
            report.merge(security.validate(input));

            let ext = input
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            let expected: &[&str] = match request.output_format {
                OutputFormat::Workbook => &["csv", "tsv", "txt"],
                OutputFormat::Csv => &["xlsx", "xls", "xlsm", "xlsb", "ods"],
            };
            let matches = ext.as_deref().map(|e| expected.contains(&e)).unwrap_or(false);
            if !matches {
                report.warn(format!(
                    "'{}' does not look like a {} source; conversion may fail",
                    input.display(),
                    match request.output_format {
                        OutputFormat::Workbook => "CSV",
                        OutputFormat::Csv => "workbook",
                    }
                ));
            }
        }

        if request.merged_workbook.is_some() && request.output_format == OutputFormat::Csv {
            report.error("merged workbook mode requires a workbook output format");
        }

        if !request.output_directory.exists() {
            report.warn(format!(
                "output directory '{}' does not exist yet; it will be created",
                request.output_directory.display()
            ));
        }

        report.merge(ConflictValidator::new().validate(request));
        report
    }

    /// Convert every input in `request`, sequentially and in order.
    ///
    /// Progress is reported as `(files_completed, Some(total_files))`
    /// after each file. Cancellation is honored between files; results
    /// collected so far are returned.
    pub fn convert_batch(
        &self,
        request: &ConversionRequest,
        mut on_progress: Option<&mut ProgressFn>,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        if request.input_paths.is_empty() {
            return Err(SheetflowError::Config(
                "request contains no input files".to_string(),
            ));
        }
        if request.merged_workbook.is_some() && request.output_format == OutputFormat::Csv {
            return Err(SheetflowError::Config(
                "merged workbook mode requires a workbook output format".to_string(),
            ));
        }
        let planner = ConversionPlanner::new(request.chunk_threshold_bytes)?;

        std::fs::create_dir_all(&request.output_directory).map_err(|e| SheetflowError::Io {
            path: request.output_directory.clone(),
            source: e,
        })?;

        if request.output_format == OutputFormat::Workbook && request.merged_workbook.is_some() {
            return self.convert_merged(request, &planner, on_progress, cancel);
        }

        let total = request.input_paths.len() as u64;
        let mut results = Vec::with_capacity(request.input_paths.len());
        for input in &request.input_paths {
            let output = request.output_path_for(input);
            let result = match request.output_format {
                OutputFormat::Csv => self.convert_one_to_csv(input, &output, request),
                OutputFormat::Workbook => {
                    self.convert_one_to_workbook(input, &output, request, &planner, cancel)
                }
            };
            results.push(match result {
                Ok((rows, warnings)) => {
                    ConversionResult::success(input.clone(), output, rows, warnings)
                }
                Err(e) => ConversionResult::failure(input.clone(), output, Vec::new(), e.to_string()),
            });

            if let Some(cb) = on_progress.as_mut() {
                cb(results.len() as u64, Some(total));
            }
            if cancel.is_cancelled() {
                break;
            }
        }

        Ok(BatchSummary::from_results(results))
    }

    fn convert_one_to_csv(
        &self,
        input: &Path,
        output: &Path,
        request: &ConversionRequest,
    ) -> Result<(u64, Vec<String>)> {
        let rows =
            ReverseConverter::new().workbook_to_csv(input, output, request.sheet.as_deref())?;
        Ok((rows, Vec::new()))
    }

    fn convert_one_to_workbook(
        &self,
        input: &Path,
        output: &Path,
        request: &ConversionRequest,
        planner: &ConversionPlanner,
        cancel: &CancellationToken,
    ) -> Result<(u64, Vec<String>)> {
        let mut warnings = Vec::new();
        let sniffer = FormatSniffer::with_config(self.config.sniff.clone());
        let format = sniffer.detect(input)?;
        if format.is_low_confidence() {
            warnings.push(format!(
                "encoding detection confidence is low ({:.2}); verify the output",
                format.confidence
            ));
        }

        let strategy = planner.plan(input)?;
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        let mut namer = SheetNamer::new();
        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("Sheet");
        ws.set_name(namer.name_for(stem))?;

        let rows = match strategy {
            Strategy::Standard => {
                StandardConverter::new().convert(input, &format, ws, request.style.as_ref())?
            }
            Strategy::Chunked => ChunkedConverter::with_chunk_rows(self.config.chunk_rows)
                .convert(input, &format, ws, request.style.as_ref(), None, cancel)?,
        };

        workbook.save(output)?;
        Ok((rows, warnings))
    }

    /// Merged mode: one workbook, one sheet per input. Per-file failures
    /// are still isolated; the workbook is saved with whatever sheets
    /// succeeded. A save failure is batch-fatal since every result
    /// shares the one output file.
    fn convert_merged(
        &self,
        request: &ConversionRequest,
        planner: &ConversionPlanner,
        mut on_progress: Option<&mut ProgressFn>,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        let output = request.output_path_for(&request.input_paths[0]);
        let total = request.input_paths.len() as u64;

        let mut workbook = Workbook::new();
        let mut namer = SheetNamer::new();
        let sniffer = FormatSniffer::with_config(self.config.sniff.clone());
        let mut results = Vec::with_capacity(request.input_paths.len());
        let mut sheets_added = 0usize;

        for input in &request.input_paths {
            let result = (|| -> Result<(u64, Vec<String>)> {
                let mut warnings = Vec::new();
                let format = sniffer.detect(input)?;
                if format.is_low_confidence() {
                    warnings.push(format!(
                        "encoding detection confidence is low ({:.2}); verify the output",
                        format.confidence
                    ));
                }
                let strategy = planner.plan(input)?;

                let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("Sheet");
                let ws = workbook.add_worksheet();
                sheets_added += 1;
                ws.set_name(namer.name_for(stem))?;

                let rows = match strategy {
                    Strategy::Standard => StandardConverter::new().convert(
                        input,
                        &format,
                        ws,
                        request.style.as_ref(),
                    )?,
                    Strategy::Chunked => ChunkedConverter::with_chunk_rows(self.config.chunk_rows)
                        .convert(input, &format, ws, request.style.as_ref(), None, cancel)?,
                };
                Ok((rows, warnings))
            })();

            results.push(match result {
                Ok((rows, warnings)) => {
                    ConversionResult::success(input.clone(), output.clone(), rows, warnings)
                }
                Err(e) => ConversionResult::failure(
                    input.clone(),
                    output.clone(),
                    Vec::new(),
                    e.to_string(),
                ),
            });

            if let Some(cb) = on_progress.as_mut() {
                cb(results.len() as u64, Some(total));
            }
            if cancel.is_cancelled() {
                break;
            }
        }

        // A workbook must contain at least one sheet to save.
        if sheets_added == 0 {
            workbook.add_worksheet();
        }
        workbook.save(&output)?;
        Ok(BatchSummary::from_results(results))
    }
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
