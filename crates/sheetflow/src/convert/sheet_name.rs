//! Sheet naming: sanitize, truncate to the 31-character limit, uniquify.

use indexmap::IndexSet;

/// Spreadsheet sheet-name hard limit.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters xlsx forbids in sheet names.
const FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Allocates unique sheet names within one workbook.
///
/// Uniqueness is case-insensitive, matching spreadsheet applications.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: IndexSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a unique sheet name derived from an input file stem.
    pub fn name_for(&mut self, stem: &str) -> String {
        let base = sanitize(stem);
        let truncated: String = base.chars().take(MAX_SHEET_NAME_CHARS).collect();

        if self.claim(&truncated) {
            return truncated;
        }

        // Numeric suffix on collision; shorten the base so the suffixed
        // name stays within the limit.
        for n in 2u32.. {
            let suffix = format!("_{}", n);
            let keep = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.chars().count());
            let mut candidate: String = truncated.chars().take(keep).collect();
            candidate.push_str(&suffix);
            if self.claim(&candidate) {
                return candidate;
            }
        }
        unreachable!("suffix space exhausted");
    }

    fn claim(&mut self, name: &str) -> bool {
        self.used.insert(name.to_lowercase())
    }
}

fn sanitize(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) || c.is_control() { '_' } else { c })
        .collect();
    let trimmed = cleaned.trim_matches('\'').trim();
    if trimmed.is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.name_for("sales"), "sales");
    }

    #[test]
    fn test_truncated_to_limit() {
        let mut namer = SheetNamer::new();
        let name = namer.name_for(&"x".repeat(40));
        assert_eq!(name.chars().count(), 31);
    }

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let mut namer = SheetNamer::new();
        let stem = "quarterly_report_with_long_name_2024";
        let first = namer.name_for(stem);
        let second = namer.name_for(stem);
        let third = namer.name_for(stem);

        assert_ne!(first, second);
        assert_ne!(second, third);
        for name in [&first, &second, &third] {
            assert!(name.chars().count() <= 31);
        }
        assert!(second.ends_with("_2"));
        assert!(third.ends_with("_3"));
    }

    #[test]
    fn test_case_insensitive_uniqueness() {
        let mut namer = SheetNamer::new();
        let a = namer.name_for("Data");
        let b = namer.name_for("data");
        assert_ne!(a.to_lowercase(), b.to_lowercase());
    }

    #[test]
    fn test_forbidden_chars_replaced() {
        let mut namer = SheetNamer::new();
        let name = namer.name_for("a/b:c*d");
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
        assert!(!name.contains('*'));
    }

    #[test]
    fn test_empty_stem_defaults() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.name_for(""), "Sheet");
    }
}
