//! Per-column semantic type inference.
//!
//! Numeric coercion is attempted first and must be total over the
//! non-null values; date coercion runs only when numeric fails and is
//! accepted when strictly more than the threshold fraction parses.
//! The ordering is a deliberate tie-break: numeric-looking dates such as
//! `20240101` stay numeric unless numeric coercion fails first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::DataTable;

/// Inferred semantic type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Calendar dates.
    Date,
    /// Text values, originals retained.
    String,
}

impl ColumnType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }
}

/// A typed cell value, chosen once per column, not per cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

/// An expected, non-exceptional coercion miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure;

/// Date formats tried in order. Compact `%Y%m%d` is safe here because
/// numeric coercion always runs first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%Y%m%d"];

/// Infers a semantic type per column from raw string values.
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    /// Fraction of non-null values that must parse as dates, exclusive.
    date_threshold: f64,
}

impl TypeInferencer {
    /// Create an inferencer with the default 0.8 date threshold.
    pub fn new() -> Self {
        Self { date_threshold: 0.8 }
    }

    /// Infer one column: returns the typed values and the chosen type.
    ///
    /// Inference is monotonic within a pass: once numeric coercion fails
    /// it is not retried, and a failed date pass falls through to String.
    pub fn infer_column(&self, raw: &[String]) -> (Vec<Value>, ColumnType) {
        let non_null: Vec<&str> = raw
            .iter()
            .map(|s| s.trim())
            .filter(|s| !DataTable::is_null_value(s))
            .collect();

        // An all-null column carries no type evidence.
        if non_null.is_empty() {
            return (vec![Value::Null; raw.len()], ColumnType::String);
        }

        if non_null.iter().all(|v| coerce_int(v).is_ok()) {
            let values = raw
                .iter()
                .map(|s| {
                    if DataTable::is_null_value(s) {
                        Value::Null
                    } else {
                        Value::Int(coerce_int(s.trim()).unwrap_or_default())
                    }
                })
                .collect();
            return (values, ColumnType::Integer);
        }

        if non_null.iter().all(|v| coerce_float(v).is_ok()) {
            let values = raw
                .iter()
                .map(|s| {
                    if DataTable::is_null_value(s) {
                        Value::Null
                    } else {
                        Value::Float(coerce_float(s.trim()).unwrap_or_default())
                    }
                })
                .collect();
            return (values, ColumnType::Float);
        }

        let parsed_dates = non_null.iter().filter(|v| coerce_date(v).is_ok()).count();
        if parsed_dates as f64 / non_null.len() as f64 > self.date_threshold {
            // Accepted: unparseable stragglers become null.
            let values = raw
                .iter()
                .map(|s| {
                    if DataTable::is_null_value(s) {
                        Value::Null
                    } else {
                        match coerce_date(s.trim()) {
                            Ok(d) => Value::Date(d),
                            Err(ParseFailure) => Value::Null,
                        }
                    }
                })
                .collect();
            return (values, ColumnType::Date);
        }

        // No coercion: original strings retained.
        let values = raw
            .iter()
            .map(|s| {
                if DataTable::is_null_value(s) {
                    Value::Null
                } else {
                    Value::Text(s.clone())
                }
            })
            .collect();
        (values, ColumnType::String)
    }

    /// Coerce a single value to an already-decided column type.
    ///
    /// Used by the chunked path after the first batch fixed the types:
    /// numeric misses fall back to text, date misses to null (matching
    /// what a whole-table date inference would have produced).
    pub fn coerce(&self, ty: ColumnType, raw: &str) -> Value {
        if DataTable::is_null_value(raw) {
            return Value::Null;
        }
        let trimmed = raw.trim();
        match ty {
            ColumnType::Integer => match coerce_int(trimmed) {
                Ok(v) => Value::Int(v),
                Err(ParseFailure) => Value::Text(raw.to_string()),
            },
            ColumnType::Float => match coerce_float(trimmed) {
                Ok(v) => Value::Float(v),
                Err(ParseFailure) => Value::Text(raw.to_string()),
            },
            ColumnType::Date => match coerce_date(trimmed) {
                Ok(d) => Value::Date(d),
                Err(ParseFailure) => Value::Null,
            },
            ColumnType::String => Value::Text(raw.to_string()),
        }
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce_int(value: &str) -> Result<i64, ParseFailure> {
    value.parse::<i64>().map_err(|_| ParseFailure)
}

fn coerce_float(value: &str) -> Result<f64, ParseFailure> {
    let parsed = value.parse::<f64>().map_err(|_| ParseFailure)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseFailure)
    }
}

fn coerce_date(value: &str) -> Result<NaiveDate, ParseFailure> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    Err(ParseFailure)
}
