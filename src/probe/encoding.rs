//! Character-encoding detection and decoding
//!
//! Detection produces an ordered list of candidate encodings with 0-100
//! confidence scores, highest first. The ranking is deterministic:
//! - A byte-order mark pins its encoding at confidence 100
//! - The statistical detector's guess is scored by how cleanly it decodes
//! - Valid UTF-8 and windows-1252 are appended as fallback candidates
//!
//! Decoding never fails: an unknown label or undecodable input yields an
//! empty string.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Minimum confidence for `decode_auto` to trust the top guess.
const AUTO_DECODE_THRESHOLD: u8 = 10;

/// One candidate encoding for a byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingGuess {
    /// Canonical encoding name (e.g. `UTF-8`, `windows-1252`, `Big5`)
    pub name: String,
    /// Confidence in the range 0-100
    pub confidence: u8,
}

/// Detect up to `max` candidate encodings for `data`, best first.
///
/// An empty buffer produces no candidates.
pub fn detect_encodings(data: &[u8], max: usize) -> Vec<EncodingGuess> {
    if data.is_empty() || max == 0 {
        return Vec::new();
    }

    let mut guesses: Vec<EncodingGuess> = Vec::new();

    if let Some((encoding, _bom_len)) = Encoding::for_bom(data) {
        push_unique(&mut guesses, encoding.name(), 100);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let best = detector.guess(None, true);
    push_unique(&mut guesses, best.name(), decode_confidence(best, data));

    if std::str::from_utf8(data).is_ok() {
        let confidence = if data.is_ascii() { 100 } else { 90 };
        push_unique(&mut guesses, UTF_8.name(), confidence);
    }

    // windows-1252 decodes any byte sequence; keep it as a low-confidence
    // last resort so callers always have a lossless-to-chars option.
    push_unique(&mut guesses, WINDOWS_1252.name(), 20);

    guesses.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    guesses.truncate(max);
    guesses
}

/// Decode `data` using the encoding named by `label`.
///
/// Returns an empty string when the label is unknown.
pub fn decode(data: &[u8], label: &str) -> String {
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) => encoding.decode(data).0.into_owned(),
        None => String::new(),
    }
}

/// Detect the encoding of `data` and decode with the top candidate.
///
/// Returns an empty string when nothing is detected with confidence of at
/// least 10.
pub fn decode_auto(data: &[u8]) -> String {
    match detect_encodings(data, 1).first() {
        Some(guess) if guess.confidence >= AUTO_DECODE_THRESHOLD => decode(data, &guess.name),
        _ => String::new(),
    }
}

/// Score a candidate by decoding cleanliness.
fn decode_confidence(encoding: &'static Encoding, data: &[u8]) -> u8 {
    let (_, _, had_errors) = encoding.decode(data);
    if had_errors {
        30
    } else if data.is_ascii() {
        100
    } else {
        85
    }
}

fn push_unique(guesses: &mut Vec<EncodingGuess>, name: &str, confidence: u8) {
    if !guesses.iter().any(|g| g.name == name) {
        guesses.push(EncodingGuess {
            name: name.to_string(),
            confidence,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_top_confidence() {
        let guesses = detect_encodings(b"plain ascii text", 3);
        assert!(!guesses.is_empty());
        assert_eq!(guesses[0].confidence, 100);
        // Candidates are ordered best-first and unique by name
        for pair in guesses.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
            assert_ne!(pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn utf8_bom_wins() {
        let data = b"\xEF\xBB\xBFhello";
        let guesses = detect_encodings(data, 3);
        assert_eq!(guesses[0].name, "UTF-8");
        assert_eq!(guesses[0].confidence, 100);
    }

    #[test]
    fn empty_buffer_has_no_candidates() {
        assert!(detect_encodings(b"", 3).is_empty());
    }

    #[test]
    fn respects_max() {
        assert!(detect_encodings(b"some bytes here", 1).len() <= 1);
        assert!(detect_encodings(b"some bytes here", 2).len() <= 2);
    }

    #[test]
    fn decode_known_label() {
        // 0xE9 is e-acute in windows-1252
        assert_eq!(decode(b"caf\xE9", "windows-1252"), "café");
        assert_eq!(decode("café".as_bytes(), "UTF-8"), "café");
    }

    #[test]
    fn decode_unknown_label() {
        assert_eq!(decode(b"anything", "no-such-encoding"), "");
    }

    #[test]
    fn decode_auto_roundtrips_utf8() {
        assert_eq!(decode_auto(b"hello world"), "hello world");
        assert_eq!(decode_auto("日本語テキスト".as_bytes()), "日本語テキスト");
    }

    #[test]
    fn decode_auto_empty_input() {
        assert_eq!(decode_auto(b""), "");
    }
}
