//! Validation framework: independent structural, security, performance,
//! and conflict checks. None of these touch the converters; they read the
//! filesystem and nothing else, so a request can be validated before or
//! instead of converting it.

mod conflict;
mod performance;
mod security;
mod structure;

pub use conflict::ConflictValidator;
pub use performance::{PerformanceEstimate, PerformanceEstimator, PerformanceLevel};
pub use security::SecurityValidator;
pub use structure::{CsvStructureValidator, WorkbookStructureValidator};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one validation pass. Never mutated after being returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False once any hard failure is recorded.
    pub is_valid: bool,
    /// Hard failures.
    pub errors: Vec<String>,
    /// Advisory findings; conversion may still proceed.
    pub warnings: Vec<String>,
    /// Structured facts gathered during the pass.
    pub info: IndexMap<String, Value>,
}

impl ValidationReport {
    /// A fresh, valid, empty report.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: IndexMap::new(),
        }
    }

    /// Record a hard failure.
    pub fn error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    /// Record an advisory finding.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a structured fact.
    pub fn note(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.info.insert(key.into(), value.into());
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_invalidates() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid);
        report.warn("just a warning");
        assert!(report.is_valid);
        report.error("hard failure");
        assert!(!report.is_valid);
    }

    #[test]
    fn test_merge_propagates_invalidity() {
        let mut a = ValidationReport::new();
        a.note("rows", 3);
        let mut b = ValidationReport::new();
        b.error("bad");
        a.merge(b);
        assert!(!a.is_valid);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.info["rows"], 3);
    }
}
