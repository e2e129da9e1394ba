//! File-level security checks: extension, filename, path shape, size.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationReport;

/// Extensions rejected outright.
const DANGEROUS_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "scr", "pif", "vbs", "vbe", "js", "jar", "sh", "ps1",
];

/// Warn (do not fail) above this size.
const SIZE_WARNING_BYTES: u64 = 1024 * 1024 * 1024;

/// Allow-listed filename characters: ASCII alphanumerics, common
/// punctuation, and the Japanese script ranges the source data uses.
static SAFE_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._\-\s()\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{4E00}-\u{9FAF}]+$")
        .expect("filename pattern is valid")
});

/// Rejects dangerous files, flags suspicious names and paths.
pub struct SecurityValidator;

impl SecurityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the file at `path`. Read-only.
    pub fn validate(&self, path: impl AsRef<Path>) -> ValidationReport {
        let path = path.as_ref();
        let mut report = ValidationReport::new();

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if DANGEROUS_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                report.error(format!("dangerous file extension: .{}", ext));
            }
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !SAFE_FILENAME.is_match(name) {
                report.warn(format!("filename contains unusual characters: '{}'", name));
            }
        } else {
            report.warn(format!(
                "filename is not valid unicode: '{}'",
                path.display()
            ));
        }

        // Path traversal is judged after resolution, not on the raw input.
        let resolved = resolve(path);
        if resolved
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            report.error(format!(
                "path escapes its directory after resolution: '{}'",
                resolved.display()
            ));
        }

        match std::fs::metadata(path) {
            Ok(metadata) => {
                if metadata.len() > SIZE_WARNING_BYTES {
                    report.warn(format!(
                        "file is very large ({} MiB); conversion may be slow",
                        metadata.len() / (1024 * 1024)
                    ));
                }
            }
            Err(_) => {
                report.warn(format!("could not read file size for '{}'", path.display()));
            }
        }

        report
    }
}

impl Default for SecurityValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonicalize when the file exists; otherwise resolve lexically against
/// the current directory so `..` segments still collapse.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    resolved.push(Component::ParentDir);
                }
            }
            other => resolved.push(other),
        }
    }
    resolved
}
