//! Conversion time estimation from file size alone.
//!
//! The model is a deliberately coarse piecewise function: it exists to
//! set user expectations and pick recommendations, not to predict wall
//! time. Estimates are pure functions of size, so repeated calls on an
//! unmodified file always agree.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetflowError};

const MIB: u64 = 1024 * 1024;

/// Coarse speed class for an estimated conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceLevel {
    Fast,
    Medium,
    Slow,
}

impl PerformanceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Fast => "fast",
            PerformanceLevel::Medium => "medium",
            PerformanceLevel::Slow => "slow",
        }
    }
}

/// One estimate: projected seconds, a speed class, and any advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    pub file_size_bytes: u64,
    pub estimated_seconds: f64,
    pub level: PerformanceLevel,
    pub recommendations: Vec<String>,
}

/// Estimates conversion cost from file size.
pub struct PerformanceEstimator;

impl PerformanceEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate conversion time for the file at `path`.
    pub fn estimate(&self, path: impl AsRef<Path>) -> Result<PerformanceEstimate> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| SheetflowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size = metadata.len();

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        Ok(self.estimate_from_size(size, is_csv))
    }

    /// The size → estimate model, exposed for callers that already have
    /// the metadata in hand.
    pub fn estimate_from_size(&self, size: u64, is_csv: bool) -> PerformanceEstimate {
        let size_mib = size as f64 / MIB as f64;
        let mut recommendations = Vec::new();

        let (mut seconds, level) = if size < MIB {
            (1.0, PerformanceLevel::Fast)
        } else if size < 10 * MIB {
            (size_mib * 2.0, PerformanceLevel::Fast)
        } else if size < 50 * MIB {
            recommendations.push("close other spreadsheet applications before converting".to_string());
            (size_mib * 3.0, PerformanceLevel::Medium)
        } else {
            recommendations.push("large file: chunked conversion will be used".to_string());
            recommendations.push("expect a multi-minute run; do not interrupt the output file".to_string());
            (size_mib * 5.0, PerformanceLevel::Slow)
        };

        // Text parsing and type inference make CSV input slower than
        // reading an already-typed workbook of the same size.
        if is_csv {
            seconds *= 1.5;
            if size > 20 * MIB {
                recommendations
                    .push("consider splitting the CSV if memory is constrained".to_string());
            }
        }

        PerformanceEstimate {
            file_size_bytes: size,
            estimated_seconds: seconds,
            level,
            recommendations,
        }
    }
}

impl Default for PerformanceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_file_is_one_second() {
        let est = PerformanceEstimator::new().estimate_from_size(100, false);
        assert_eq!(est.estimated_seconds, 1.0);
        assert_eq!(est.level, PerformanceLevel::Fast);
        assert!(est.recommendations.is_empty());
    }

    #[test]
    fn test_csv_multiplier() {
        let workbook = PerformanceEstimator::new().estimate_from_size(5 * MIB, false);
        let csv = PerformanceEstimator::new().estimate_from_size(5 * MIB, true);
        assert!((csv.estimated_seconds - workbook.estimated_seconds * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_levels_follow_size() {
        let est = PerformanceEstimator::new();
        assert_eq!(est.estimate_from_size(512 * 1024, true).level, PerformanceLevel::Fast);
        assert_eq!(est.estimate_from_size(20 * MIB, true).level, PerformanceLevel::Medium);
        assert_eq!(est.estimate_from_size(80 * MIB, true).level, PerformanceLevel::Slow);
    }

    #[test]
    fn test_slow_files_get_recommendations() {
        let est = PerformanceEstimator::new().estimate_from_size(80 * MIB, true);
        assert_eq!(est.level, PerformanceLevel::Slow);
        assert!(est.recommendations.iter().any(|r| r.contains("chunked")));
        assert!(est.recommendations.iter().any(|r| r.contains("splitting")));
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let a = PerformanceEstimator::new().estimate_from_size(30 * MIB, true);
        let b = PerformanceEstimator::new().estimate_from_size(30 * MIB, true);
        assert_eq!(a.estimated_seconds, b.estimated_seconds);
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PerformanceEstimator::new()
            .estimate("/no/such/file.csv")
            .unwrap_err();
        assert!(matches!(err, SheetflowError::Io { .. }));
    }
}
