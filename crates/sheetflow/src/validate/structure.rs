//! Structural sanity checks for CSV files and workbooks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use serde_json::json;

use crate::sniff::{DecodingReader, FormatSniffer, SniffConfig};
use crate::table::DataTable;

use super::ValidationReport;

/// Rows sampled from the head of a CSV for structure checks.
const DEFAULT_SAMPLE_ROWS: usize = 1000;

/// Validates CSV shape from a bounded row sample.
///
/// Everything short of an unreadable or unparsable file is a warning:
/// odd headers and empty columns are evidence, not verdicts.
pub struct CsvStructureValidator {
    sniffer: FormatSniffer,
    sample_rows: usize,
}

impl CsvStructureValidator {
    pub fn new() -> Self {
        Self {
            sniffer: FormatSniffer::new(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    pub fn with_sniff_config(config: SniffConfig) -> Self {
        Self {
            sniffer: FormatSniffer::with_config(config),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    /// Validate the CSV at `path`. Read-only; deterministic for an
    /// unmodified input.
    pub fn validate(&self, path: impl AsRef<Path>) -> ValidationReport {
        let path = path.as_ref();
        let mut report = ValidationReport::new();

        let format = match self.sniffer.detect(path) {
            Ok(format) => format,
            Err(e) => {
                report.error(format!("cannot read '{}': {}", path.display(), e));
                return report;
            }
        };

        report.note("encoding", format.encoding.name());
        report.note("confidence", format.confidence);
        report.note("delimiter", (format.delimiter as char).to_string());
        if format.is_low_confidence() {
            report.warn(format!(
                "encoding detection confidence is low ({:.2}); converted text may be garbled",
                format.confidence
            ));
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                report.error(format!("cannot open '{}': {}", path.display(), e));
                return report;
            }
        };
        let decoder = DecodingReader::new(BufReader::new(file), format.encoding);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(decoder);

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(Ok(record)) => record.iter().map(str::to_string).collect(),
            Some(Err(e)) => {
                report.error(format!("CSV parse error in '{}': {}", path.display(), e));
                return report;
            }
            None => {
                report.note("rows", 0);
                report.note("columns", 0);
                report.warn("file is empty");
                return report;
            }
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in records.take(self.sample_rows) {
            match record {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    report.error(format!("CSV parse error in '{}': {}", path.display(), e));
                    return report;
                }
            }
        }

        let table = DataTable::new(headers, rows);
        report.note("rows", table.row_count());
        report.note("columns", table.column_count());

        let has_header = self.check_headers(&table, &mut report);
        report.note("has_header", has_header);
        self.check_empty_columns(&table, &mut report);

        report
    }

    /// Header heuristics; returns false when the first row looks like data.
    fn check_headers(&self, table: &DataTable, report: &mut ValidationReport) -> bool {
        let headers = &table.headers;
        let mut plausible = true;

        let empty = headers.iter().filter(|h| h.trim().is_empty()).count();
        if empty > 0 {
            report.warn(format!("{} empty header name(s)", empty));
            plausible = false;
        }

        let mut seen = std::collections::HashSet::new();
        let duplicates: Vec<&String> = headers.iter().filter(|h| !seen.insert(h.as_str())).collect();
        if !duplicates.is_empty() {
            report.warn(format!(
                "duplicated header name(s): {}",
                duplicates
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            plausible = false;
        }

        // Mostly-numeric headers are weak evidence of a missing header row.
        let numeric = headers
            .iter()
            .filter(|h| !h.is_empty() && h.chars().all(|c| c.is_ascii_digit()))
            .count();
        if !headers.is_empty() && numeric * 2 > headers.len() {
            report.warn("more than half the headers are purely numeric; the header row may be missing");
            plausible = false;
        }

        plausible
    }

    fn check_empty_columns(&self, table: &DataTable, report: &mut ValidationReport) {
        if table.row_count() == 0 {
            return;
        }
        let empty: Vec<&str> = (0..table.column_count())
            .filter(|&col| {
                table
                    .column_values(col)
                    .all(DataTable::is_null_value)
            })
            .map(|col| table.headers[col].as_str())
            .collect();
        if !empty.is_empty() {
            report.warn(format!("column(s) with no values: {}", empty.join(", ")));
        }
    }
}

impl Default for CsvStructureValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates workbook shape across all sheets.
pub struct WorkbookStructureValidator;

impl WorkbookStructureValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the workbook at `path`. Zero data rows across every sheet
    /// is the one hard failure; empty individual sheets only warn.
    pub fn validate(&self, path: impl AsRef<Path>) -> ValidationReport {
        let path = path.as_ref();
        let mut report = ValidationReport::new();

        let mut workbook = match open_workbook_auto(path) {
            Ok(wb) => wb,
            Err(e) => {
                report.error(format!("cannot open workbook '{}': {}", path.display(), e));
                return report;
            }
        };

        let sheet_names = workbook.sheet_names().to_vec();
        report.note("sheets", json!(sheet_names));

        let mut total_rows = 0usize;
        let mut max_columns = 0usize;
        for name in &sheet_names {
            match workbook.worksheet_range(name) {
                Ok(range) => {
                    let (rows, cols) = range.get_size();
                    total_rows += rows;
                    max_columns = max_columns.max(cols);
                    if rows == 0 {
                        report.warn(format!("sheet '{}' is empty", name));
                    }
                }
                Err(e) => {
                    report.warn(format!("failed to read sheet '{}': {}", name, e));
                }
            }
        }

        report.note("total_rows", total_rows);
        report.note("total_columns", max_columns);
        if total_rows == 0 {
            report.error("workbook contains no data rows");
        }

        report
    }
}

impl Default for WorkbookStructureValidator {
    fn default() -> Self {
        Self::new()
    }
}
