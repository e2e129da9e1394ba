//! Workbook → CSV conversion.
//!
//! Output encoding is fixed: UTF-8 with a leading byte-order mark, because
//! spreadsheet applications on some platforms otherwise misread UTF-8 CSV.
//! Deliberate compatibility choice, not configurable.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{Result, SheetflowError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Converts one workbook sheet to CSV.
pub struct ReverseConverter;

impl ReverseConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a sheet of `input` to CSV at `target`.
    ///
    /// The first sheet is used unless `sheet` names another one — a
    /// documented default, not silent loss: callers wanting every sheet
    /// issue one request per sheet. Returns data rows written, header
    /// row excluded.
    pub fn workbook_to_csv(
        &self,
        input: &Path,
        target: &Path,
        sheet: Option<&str>,
    ) -> Result<u64> {
        if !input.exists() {
            return Err(SheetflowError::NotFound {
                path: input.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(input)?;
        let sheet_names = workbook.sheet_names().to_vec();
        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(SheetflowError::Format(format!(
                        "sheet '{}' not found in '{}' (available: {})",
                        name,
                        input.display(),
                        sheet_names.join(", ")
                    )));
                }
                name.to_string()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| {
                    SheetflowError::Format(format!("'{}' contains no sheets", input.display()))
                })?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let file = File::create(target).map_err(|e| SheetflowError::Io {
            path: target.to_path_buf(),
            source: e,
        })?;
        let mut out = BufWriter::new(file);
        out.write_all(UTF8_BOM).map_err(|e| SheetflowError::Io {
            path: target.to_path_buf(),
            source: e,
        })?;

        let mut writer = csv::Writer::from_writer(out);
        let mut total_rows: u64 = 0;
        for row in range.rows() {
            let record: Vec<String> = row.iter().map(render_cell).collect();
            writer.write_record(&record)?;
            total_rows += 1;
        }
        writer.flush().map_err(|e| SheetflowError::Io {
            path: target.to_path_buf(),
            source: e,
        })?;

        Ok(total_rows.saturating_sub(1))
    }
}

impl Default for ReverseConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one cell as CSV text.
///
/// Integral floats lose the trailing `.0` so values survive a
/// csv → workbook → csv round trip byte-comparably.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => {
                ndt.date().format("%Y-%m-%d").to_string()
            }
            Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn sample_workbook(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("input.xlsx");
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "name").unwrap();
        ws.write_string(0, 1, "score").unwrap();
        ws.write_string(1, 0, "Alice").unwrap();
        ws.write_number(1, 1, 30.0).unwrap();
        ws.write_string(2, 0, "Bob").unwrap();
        ws.write_number(2, 1, 2.5).unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_first_sheet_with_bom() {
        let dir = tempdir().unwrap();
        let input = sample_workbook(dir.path());
        let target = dir.path().join("out.csv");

        let rows = ReverseConverter::new()
            .workbook_to_csv(&input, &target, None)
            .unwrap();
        assert_eq!(rows, 2);

        let bytes = std::fs::read(&target).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("name,score\n"));
        assert!(text.contains("Alice,30\n"));
        assert!(text.contains("Bob,2.5\n"));
    }

    #[test]
    fn test_unknown_sheet_is_an_error() {
        let dir = tempdir().unwrap();
        let input = sample_workbook(dir.path());
        let target = dir.path().join("out.csv");

        let err = ReverseConverter::new()
            .workbook_to_csv(&input, &target, Some("nope"))
            .unwrap_err();
        assert!(matches!(err, SheetflowError::Format(_)));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = ReverseConverter::new()
            .workbook_to_csv(Path::new("/no/such.xlsx"), &dir.path().join("o.csv"), None)
            .unwrap_err();
        assert!(matches!(err, SheetflowError::NotFound { .. }));
    }

    #[test]
    fn test_integral_float_rendering() {
        assert_eq!(render_cell(&Data::Float(30.0)), "30");
        assert_eq!(render_cell(&Data::Float(2.5)), "2.5");
        assert_eq!(render_cell(&Data::Empty), "");
    }
}
