//! Chunked (streaming) CSV → worksheet conversion.
//!
//! Rows are read in fixed-size batches and written straight into
//! worksheet cells, so peak memory is proportional to one batch rather
//! than the whole file. Column types are inferred from the first batch
//! alone — a documented approximation: a column whose non-numeric values
//! only appear after the first batch is written with the first batch's
//! type (numeric misses fall back to text, date misses to null).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rust_xlsxwriter::Worksheet;

use crate::error::{Result, SheetflowError};
use crate::infer::{ColumnType, TypeInferencer};
use crate::progress::{CancellationToken, ProgressFn};
use crate::sniff::{DecodingReader, DetectedFormat};

use super::{autofit_columns, observe_widths, write_header, CellWriter, StyleOptions, DEFAULT_CHUNK_ROWS};

/// Streams row batches through inference into a worksheet.
pub struct ChunkedConverter {
    inferencer: TypeInferencer,
    chunk_rows: usize,
}

impl ChunkedConverter {
    pub fn new() -> Self {
        Self::with_chunk_rows(DEFAULT_CHUNK_ROWS)
    }

    pub fn with_chunk_rows(chunk_rows: usize) -> Self {
        Self {
            inferencer: TypeInferencer::new(),
            chunk_rows: chunk_rows.max(1),
        }
    }

    /// Convert `input` into the given worksheet, one batch at a time.
    ///
    /// Progress is reported once per batch as `(rows_processed, None)`.
    /// Cancellation is checked between batches; on cancel the rows
    /// already written stay in the worksheet and the count so far is
    /// returned.
    pub fn convert(
        &self,
        input: &Path,
        format: &DetectedFormat,
        ws: &mut Worksheet,
        style: Option<&StyleOptions>,
        mut on_progress: Option<&mut ProgressFn>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        if !input.exists() {
            return Err(SheetflowError::NotFound {
                path: input.to_path_buf(),
            });
        }
        let file = File::open(input).map_err(|e| SheetflowError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        let decoder = DecodingReader::new(BufReader::new(file), format.encoding);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(decoder);

        let mut records = reader.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Ok(0), // empty file: empty sheet, not an error
        };
        write_header(ws, &headers, style)?;

        let writer = CellWriter::new();
        let mut column_types: Option<Vec<ColumnType>> = None;
        let mut widths: Vec<usize> = Vec::new();
        observe_widths(&mut widths, &headers);

        let mut rows_written: u64 = 0;
        let mut batch: Vec<Vec<String>> = Vec::with_capacity(self.chunk_rows);

        loop {
            batch.clear();
            for record in records.by_ref() {
                let record = record?;
                let mut row: Vec<String> = record.iter().map(str::to_string).collect();
                row.resize(headers.len(), String::new());
                batch.push(row);
                if batch.len() >= self.chunk_rows {
                    break;
                }
            }
            if batch.is_empty() {
                break;
            }

            let types = match &column_types {
                Some(types) => types,
                None => {
                    // First batch: the only data inference ever sees.
                    let inferred = self.infer_from_batch(&headers, &batch);
                    for row in &batch {
                        observe_widths(&mut widths, row);
                    }
                    column_types = Some(inferred);
                    column_types.as_ref().unwrap()
                }
            };

            for row in &batch {
                rows_written += 1;
                let excel_row = rows_written as u32; // header occupies row 0
                for (col, raw) in row.iter().enumerate() {
                    let value = self.inferencer.coerce(types[col], raw);
                    writer.write(ws, excel_row, col as u16, &value)?;
                }
            }

            if let Some(cb) = on_progress.as_mut() {
                cb(rows_written, None);
            }
            if cancel.is_cancelled() {
                break;
            }
        }

        if style.map(|s| s.autofit_columns).unwrap_or(false) {
            // Widths from header + first batch only, consistent with the
            // first-batch inference approximation.
            autofit_columns(ws, &widths)?;
        }

        Ok(rows_written)
    }

    fn infer_from_batch(&self, headers: &[String], batch: &[Vec<String>]) -> Vec<ColumnType> {
        (0..headers.len())
            .map(|col| {
                let raw: Vec<String> = batch
                    .iter()
                    .map(|row| row.get(col).cloned().unwrap_or_default())
                    .collect();
                let (_, ty) = self.inferencer.infer_column(&raw);
                ty
            })
            .collect()
    }
}

impl Default for ChunkedConverter {
    fn default() -> Self {
        Self::new()
    }
}
