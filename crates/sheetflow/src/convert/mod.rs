//! CSV ⇄ workbook conversion engine.

mod chunked;
mod planner;
mod reverse;
mod sheet_name;
mod standard;

pub use chunked::ChunkedConverter;
pub use planner::{ConversionPlanner, Strategy, DEFAULT_CHUNK_THRESHOLD_BYTES};
pub use reverse::ReverseConverter;
pub use sheet_name::SheetNamer;
pub use standard::StandardConverter;

use rust_xlsxwriter::{Color, Format, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};

use crate::infer::Value;
use crate::sniff::SniffConfig;

/// Default rows per chunk in the streaming path.
pub const DEFAULT_CHUNK_ROWS: usize = 10_000;

/// Widest auto-fitted column, in characters.
const MAX_COLUMN_WIDTH: usize = 50;

/// Header styling applied to generated workbooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Bold header row.
    pub header_bold: bool,
    /// Header background fill as 0xRRGGBB.
    pub header_background: Option<u32>,
    /// Widen columns to fit their content (capped at 50 characters).
    pub autofit_columns: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            header_bold: true,
            header_background: Some(0xE0E0E0),
            autofit_columns: true,
        }
    }
}

/// Engine configuration, shared across the files of a batch. Per-file
/// knobs (threshold, styling, sheet selection) live on the request.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Rows per batch in the chunked path.
    pub chunk_rows: usize,
    /// Format sniffer configuration.
    pub sniff: SniffConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            chunk_rows: DEFAULT_CHUNK_ROWS,
            sniff: SniffConfig::default(),
        }
    }
}

/// Writes typed values into worksheet cells with a shared date format.
pub(crate) struct CellWriter {
    date_format: Format,
}

impl CellWriter {
    pub(crate) fn new() -> Self {
        Self {
            date_format: Format::new().set_num_format("yyyy-mm-dd"),
        }
    }

    pub(crate) fn write(
        &self,
        ws: &mut Worksheet,
        row: u32,
        col: u16,
        value: &Value,
    ) -> Result<(), XlsxError> {
        match value {
            Value::Null => {}
            Value::Int(v) => {
                ws.write_number(row, col, *v as f64)?;
            }
            Value::Float(v) => {
                ws.write_number(row, col, *v)?;
            }
            Value::Date(d) => {
                ws.write_datetime_with_format(row, col, *d, &self.date_format)?;
            }
            Value::Text(s) => {
                ws.write_string(row, col, s)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn header_format(style: &StyleOptions) -> Format {
    let mut format = Format::new();
    if style.header_bold {
        format = format.set_bold();
    }
    if let Some(rgb) = style.header_background {
        format = format.set_background_color(Color::RGB(rgb));
    }
    format
}

/// Write the header row, styled or plain.
pub(crate) fn write_header(
    ws: &mut Worksheet,
    headers: &[String],
    style: Option<&StyleOptions>,
) -> Result<(), XlsxError> {
    let format = style.map(header_format);
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        match &format {
            Some(f) => {
                ws.write_string_with_format(0, col, header, f)?;
            }
            None => {
                ws.write_string(0, col, header)?;
            }
        }
    }
    Ok(())
}

/// Widen columns to their longest observed value, capped.
pub(crate) fn autofit_columns(
    ws: &mut Worksheet,
    widths: &[usize],
) -> Result<(), XlsxError> {
    for (col, &max_len) in widths.iter().enumerate() {
        let width = (max_len + 2).min(MAX_COLUMN_WIDTH);
        ws.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

/// Track per-column content width for autofit.
pub(crate) fn observe_widths(widths: &mut Vec<usize>, row: &[String]) {
    if widths.len() < row.len() {
        widths.resize(row.len(), 0);
    }
    for (i, cell) in row.iter().enumerate() {
        let len = cell.chars().count();
        if len > widths[i] {
            widths[i] = len;
        }
    }
}
