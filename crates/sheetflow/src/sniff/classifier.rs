//! Statistical byte-distribution classifier for encoding detection.
//!
//! Produces a best-guess encoding plus a confidence score in [0, 1].
//! The score is intentionally conservative for legacy multi-byte
//! encodings: their byte statistics overlap enough that the sniffer's
//! ordered probe list should make the final call, not this classifier.

use encoding_rs::{Encoding, EUC_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Classify a raw byte sample into an encoding guess with confidence.
pub(crate) fn classify(sample: &[u8]) -> (&'static Encoding, f64) {
    if sample.is_empty() {
        return (UTF_8, 1.0);
    }

    // Byte-order marks are definitive.
    if sample.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return (UTF_8, 1.0);
    }
    if sample.starts_with(&[0xFF, 0xFE]) {
        return (UTF_16LE, 1.0);
    }
    if sample.starts_with(&[0xFE, 0xFF]) {
        return (UTF_16BE, 1.0);
    }

    if sample.is_ascii() {
        return (UTF_8, 1.0);
    }

    if is_valid_utf8_prefix(sample) {
        // Valid multi-byte UTF-8 almost never happens by accident.
        return (UTF_8, 0.9);
    }

    // Legacy double-byte candidates: score by how much of the non-ASCII
    // byte mass forms valid lead/trail pairs.
    let sjis = pair_ratio(sample, is_sjis_pair, is_sjis_single);
    let euc = pair_ratio(sample, is_euc_pair, is_euc_single);

    let (encoding, ratio) = if sjis >= euc {
        (SHIFT_JIS, sjis)
    } else {
        (EUC_JP, euc)
    };

    if ratio > 0.0 {
        // Capped below the sniffer's 0.7 confidence floor so the ordered
        // fallback probe always arbitrates between legacy encodings.
        (encoding, 0.3 + 0.35 * ratio)
    } else {
        // Arbitrary single bytes decode under windows-1252 but carry no
        // statistical signal.
        (WINDOWS_1252, 0.2)
    }
}

/// Valid UTF-8, tolerating one multi-byte sequence cut off by the sample edge.
fn is_valid_utf8_prefix(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && e.valid_up_to() + 4 > sample.len(),
    }
}

fn is_sjis_pair(lead: u8, trail: u8) -> bool {
    let lead_ok = matches!(lead, 0x81..=0x9F | 0xE0..=0xFC);
    let trail_ok = matches!(trail, 0x40..=0x7E | 0x80..=0xFC);
    lead_ok && trail_ok
}

/// Half-width katakana occupy a single byte in Shift_JIS.
fn is_sjis_single(byte: u8) -> bool {
    matches!(byte, 0xA1..=0xDF)
}

fn is_euc_pair(lead: u8, trail: u8) -> bool {
    matches!(lead, 0xA1..=0xFE) && matches!(trail, 0xA1..=0xFE)
}

fn is_euc_single(_byte: u8) -> bool {
    false
}

/// Fraction of non-ASCII bytes consumed by valid pairs/singles for a candidate.
fn pair_ratio(
    sample: &[u8],
    pair_ok: fn(u8, u8) -> bool,
    single_ok: fn(u8) -> bool,
) -> f64 {
    let mut matched = 0usize;
    let mut non_ascii = 0usize;
    let mut i = 0usize;

    while i < sample.len() {
        let b = sample[i];
        if b.is_ascii() {
            i += 1;
            continue;
        }
        non_ascii += 1;
        if single_ok(b) {
            matched += 1;
            i += 1;
            continue;
        }
        if i + 1 < sample.len() && pair_ok(b, sample[i + 1]) {
            if !sample[i + 1].is_ascii() {
                non_ascii += 1;
                matched += 1;
            }
            matched += 1;
            i += 2;
            continue;
        }
        i += 1;
    }

    if non_ascii == 0 {
        0.0
    } else {
        matched as f64 / non_ascii as f64
    }
}
