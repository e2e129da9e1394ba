//! In-memory tabular data.

/// Parsed tabular data: a header row plus string rows.
///
/// Built eagerly by the standard conversion path and per-batch by the
/// chunked path. All rows are padded/truncated to the header width, so
/// `row_count` is identical across columns by construction.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table, normalizing every row to the header width.
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            while row.len() < width {
                row.push(String::new());
            }
            row.truncate(width);
        }
        Self { headers, rows }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// A specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Whether a cell counts as missing.
    ///
    /// Conversion deliberately treats only blank cells as null: literal
    /// strings like "NA" are user data and must survive a round trip.
    pub fn is_null_value(value: &str) -> bool {
        value.trim().is_empty()
    }
}
