//! Output collision checks for a conversion request.
//!
//! Overwrites are allowed; this validator only makes them visible before
//! they happen, as warnings the caller can act on.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::json;

use crate::batch::ConversionRequest;

use super::ValidationReport;

/// Warns about outputs that already exist or collide within the batch.
pub struct ConflictValidator;

impl ConflictValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check the request's output mapping. Read-only.
    pub fn validate(&self, request: &ConversionRequest) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut existing: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();

        for input in &request.input_paths {
            let output = request.output_path_for(input);

            if output.exists() {
                existing.push((input.clone(), output.clone()));
            }

            // In merged mode every input maps to the one workbook; that
            // is the point, not a collision.
            if request.merged_workbook.is_none() {
                if let Some(first) = claimed.get(&output) {
                    report.warn(format!(
                        "'{}' and '{}' both map to '{}'; the later file overwrites the earlier",
                        first.display(),
                        input.display(),
                        output.display()
                    ));
                } else {
                    claimed.insert(output, input);
                }
            }
        }

        if !existing.is_empty() {
            report.warn(format!(
                "{} output file(s) already exist and will be overwritten",
                existing.len()
            ));
            report.note(
                "existing_outputs",
                json!(existing
                    .iter()
                    .map(|(input, output)| json!({
                        "input": input.display().to_string(),
                        "output": output.display().to_string(),
                    }))
                    .collect::<Vec<_>>()),
            );
        }

        report
    }
}

impl Default for ConflictValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::OutputFormat;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_no_conflicts() {
        let dir = tempdir().unwrap();
        let request = ConversionRequest::new(
            vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
            OutputFormat::Workbook,
            dir.path().to_path_buf(),
        );
        let report = ConflictValidator::new().validate(&request);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_existing_output_warns() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.xlsx"), b"stale").unwrap();

        let request = ConversionRequest::new(
            vec![PathBuf::from("a.csv")],
            OutputFormat::Workbook,
            dir.path().to_path_buf(),
        );
        let report = ConflictValidator::new().validate(&request);
        assert!(report.is_valid);
        assert!(report.warnings.iter().any(|w| w.contains("overwritten")));
        assert_eq!(report.info["existing_outputs"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_same_stem_collision_warns() {
        let dir = tempdir().unwrap();
        let request = ConversionRequest::new(
            vec![PathBuf::from("x/report.csv"), PathBuf::from("y/report.csv")],
            OutputFormat::Workbook,
            dir.path().to_path_buf(),
        );
        let report = ConflictValidator::new().validate(&request);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("both map to")));
    }

    #[test]
    fn test_merged_mode_is_not_a_collision() {
        let dir = tempdir().unwrap();
        let mut request = ConversionRequest::new(
            vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
            OutputFormat::Workbook,
            dir.path().to_path_buf(),
        );
        request.merged_workbook = Some("all".to_string());
        let report = ConflictValidator::new().validate(&request);
        assert!(report.warnings.is_empty());
    }
}
