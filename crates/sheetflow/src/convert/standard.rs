//! Standard (in-memory) CSV → worksheet conversion.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Worksheet;

use crate::error::{Result, SheetflowError};
use crate::infer::TypeInferencer;
use crate::sniff::DetectedFormat;
use crate::table::DataTable;

use super::{autofit_columns, observe_widths, write_header, CellWriter, StyleOptions};

/// Loads the whole file, infers column types, writes one sheet.
pub struct StandardConverter {
    inferencer: TypeInferencer,
}

impl StandardConverter {
    pub fn new() -> Self {
        Self {
            inferencer: TypeInferencer::new(),
        }
    }

    /// Convert `input` into the given worksheet.
    ///
    /// Returns the number of data rows written (header excluded). An
    /// empty file produces a headers-only or fully empty sheet; that is
    /// not an error.
    pub fn convert(
        &self,
        input: &Path,
        format: &DetectedFormat,
        ws: &mut Worksheet,
        style: Option<&StyleOptions>,
    ) -> Result<u64> {
        let table = self.read_table(input, format)?;

        if table.headers.is_empty() {
            return Ok(0);
        }

        write_header(ws, &table.headers, style)?;

        let writer = CellWriter::new();
        let mut widths: Vec<usize> = Vec::new();
        observe_widths(&mut widths, &table.headers);
        for row in &table.rows {
            observe_widths(&mut widths, row);
        }

        // Column-at-a-time: the type is chosen once per column.
        for col in 0..table.column_count() {
            let raw: Vec<String> = table.column_values(col).map(str::to_string).collect();
            let (values, _ty) = self.inferencer.infer_column(&raw);
            for (row_idx, value) in values.iter().enumerate() {
                writer.write(ws, row_idx as u32 + 1, col as u16, value)?;
            }
        }

        if style.map(|s| s.autofit_columns).unwrap_or(false) {
            autofit_columns(ws, &widths)?;
        }

        Ok(table.row_count() as u64)
    }

    /// Decode the whole file under the detected encoding and parse it.
    fn read_table(&self, input: &Path, format: &DetectedFormat) -> Result<DataTable> {
        if !input.exists() {
            return Err(SheetflowError::NotFound {
                path: input.to_path_buf(),
            });
        }
        let bytes = fs::read(input).map_err(|e| SheetflowError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        let (decoded, _, _) = format.encoding.decode(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(decoded.as_bytes());

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for StandardConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniff::FormatSniffer;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_input(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    fn convert_to_temp(content: &[u8]) -> u64 {
        let input = write_input(content);
        let format = FormatSniffer::new().detect(input.path()).unwrap();

        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        StandardConverter::new()
            .convert(input.path(), &format, ws, Some(&StyleOptions::default()))
            .unwrap()
    }

    #[test]
    fn test_rows_written_excludes_header() {
        let rows = convert_to_temp(b"name,age\nAlice,30\nBob,25\n");
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_empty_file_is_not_an_error() {
        let rows = convert_to_temp(b"");
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_headers_only_file() {
        let rows = convert_to_temp(b"name,age\n");
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_missing_input_fails_before_write() {
        let format = FormatSniffer::new().detect_from_sample(b"a,b\n");
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        let err = StandardConverter::new()
            .convert(Path::new("/no/such/file.csv"), &format, ws, None)
            .unwrap_err();
        assert!(matches!(err, SheetflowError::NotFound { .. }));
    }
}
