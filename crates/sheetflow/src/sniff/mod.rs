//! Encoding and delimiter detection from a raw byte sample.

mod classifier;
mod decode;

pub use decode::DecodingReader;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, EUC_JP, SHIFT_JIS, UTF_8};

use crate::error::{Result, SheetflowError};

/// Candidate delimiters, in the order they are counted.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Sniffer configuration.
///
/// The fallback probe list is injected here rather than kept as a module
/// global so tests can substitute deterministic fixtures.
#[derive(Debug, Clone)]
pub struct SniffConfig {
    /// Bytes to read from the head of the file for detection.
    pub sample_bytes: usize,
    /// Ordered probe list used when classifier confidence is low.
    pub fallback_encodings: Vec<&'static Encoding>,
    /// Confidence below which the probe list overrides the classifier.
    pub confidence_floor: f64,
}

impl Default for SniffConfig {
    fn default() -> Self {
        Self {
            sample_bytes: 8192,
            fallback_encodings: vec![UTF_8, SHIFT_JIS, EUC_JP],
            confidence_floor: 0.7,
        }
    }
}

/// Detected format for one source file.
///
/// File-scoped: produced fresh per file, never cached across files.
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    /// Detected character encoding.
    pub encoding: &'static Encoding,
    /// Classifier confidence in [0, 1]. A heuristic, not a guarantee;
    /// callers should surface low values to the user.
    pub confidence: f64,
    /// Detected field delimiter.
    pub delimiter: u8,
}

impl DetectedFormat {
    /// True when the caller should warn about an uncertain detection.
    pub fn is_low_confidence(&self) -> bool {
        self.confidence < 0.7
    }
}

/// Detects byte encoding and field delimiter from a head sample.
pub struct FormatSniffer {
    config: SniffConfig,
}

impl FormatSniffer {
    /// Create a sniffer with default configuration.
    pub fn new() -> Self {
        Self::with_config(SniffConfig::default())
    }

    /// Create a sniffer with custom configuration.
    pub fn with_config(config: SniffConfig) -> Self {
        Self { config }
    }

    /// Detect encoding and delimiter for the file at `path`.
    pub fn detect(&self, path: impl AsRef<Path>) -> Result<DetectedFormat> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetflowError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path).map_err(|e| SheetflowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut sample = vec![0u8; self.config.sample_bytes];
        let mut filled = 0;
        while filled < sample.len() {
            let n = file
                .read(&mut sample[filled..])
                .map_err(|e| SheetflowError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        sample.truncate(filled);

        Ok(self.detect_from_sample(&sample))
    }

    /// Detect format from an already-read sample.
    pub fn detect_from_sample(&self, sample: &[u8]) -> DetectedFormat {
        let (mut encoding, confidence) = classifier::classify(sample);

        if confidence < self.config.confidence_floor {
            // Low-confidence guess: the first probe candidate that decodes
            // the sample cleanly wins, overriding the classifier.
            for candidate in &self.config.fallback_encodings {
                if probe(candidate, sample) {
                    encoding = candidate;
                    break;
                }
            }
        }

        let delimiter = detect_delimiter(encoding, sample);

        DetectedFormat {
            encoding,
            confidence,
            delimiter,
        }
    }
}

impl Default for FormatSniffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempt a strict decode of the sample under `encoding`.
///
/// Up to three trailing bytes are dropped before giving up, so a
/// multi-byte sequence cut off at the sample boundary does not disqualify
/// an otherwise clean candidate.
fn probe(encoding: &'static Encoding, sample: &[u8]) -> bool {
    for trim in 0..=3usize.min(sample.len()) {
        let slice = &sample[..sample.len() - trim];
        if encoding
            .decode_without_bom_handling_and_without_replacement(slice)
            .is_some()
        {
            return true;
        }
    }
    false
}

/// Count candidate delimiters in the decoded sample; highest count wins,
/// comma by default.
fn detect_delimiter(encoding: &'static Encoding, sample: &[u8]) -> u8 {
    let (decoded, _, _) = encoding.decode(sample);

    let mut best = b',';
    let mut best_count = 0usize;
    for &delim in DELIMITERS {
        let count = decoded.bytes().filter(|&b| b == delim).count();
        if count > best_count {
            best_count = count;
            best = delim;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_comma() {
        let sniffer = FormatSniffer::new();
        let format = sniffer.detect_from_sample(b"a,b,c\n1,2,3\n");
        assert_eq!(format.delimiter, b',');
        assert_eq!(format.encoding, UTF_8);
    }

    #[test]
    fn test_detect_tab() {
        let sniffer = FormatSniffer::new();
        let format = sniffer.detect_from_sample(b"a\tb\tc\n1\t2\t3\n");
        assert_eq!(format.delimiter, b'\t');
    }

    #[test]
    fn test_detect_semicolon_and_pipe() {
        let sniffer = FormatSniffer::new();
        assert_eq!(sniffer.detect_from_sample(b"a;b;c\n1;2;3\n").delimiter, b';');
        assert_eq!(sniffer.detect_from_sample(b"a|b|c\n1|2|3\n").delimiter, b'|');
    }

    #[test]
    fn test_no_delimiter_defaults_to_comma() {
        let sniffer = FormatSniffer::new();
        assert_eq!(sniffer.detect_from_sample(b"justonecolumn\nvalue\n").delimiter, b',');
    }

    #[test]
    fn test_low_confidence_takes_first_decodable_fallback() {
        let sniffer = FormatSniffer::new();
        // Shift_JIS "テスト": invalid UTF-8, classifier stays below the
        // floor, and Shift_JIS is the first fallback that decodes.
        let format = sniffer.detect_from_sample(b"a,b\n\x83\x65\x83\x58\x83\x67,1\n");
        assert!(format.confidence < 0.7);
        assert_eq!(format.encoding, SHIFT_JIS);
    }

    #[test]
    fn test_fallback_order_is_injected() {
        let config = SniffConfig {
            fallback_encodings: vec![EUC_JP, SHIFT_JIS],
            ..SniffConfig::default()
        };
        let sniffer = FormatSniffer::with_config(config);
        // Bytes valid under both EUC-JP and Shift_JIS; the injected order
        // decides.
        let format = sniffer.detect_from_sample(b"\xA4\xA2,1\n");
        assert_eq!(format.encoding, EUC_JP);
    }

    #[test]
    fn test_detect_missing_file() {
        let sniffer = FormatSniffer::new();
        let err = sniffer.detect("/no/such/file.csv").unwrap_err();
        assert!(matches!(err, SheetflowError::NotFound { .. }));
    }
}
