//! Coordinate extraction from noisy OCR text
//!
//! Recognized text from a "座標: X, Y, Z" readout is dominated by corrupted
//! label and separator characters, but the three numbers themselves are
//! almost always recognized as clean digit runs. The extractor therefore
//! anchors on "first three numeric tokens after the last colon" instead of
//! parsing any structured syntax: normalize confusable characters, cut away
//! the (frequently garbled) label, scan for number-shaped tokens, parse.

use regex::Regex;
use std::sync::OnceLock;

/// Optional sign, digit run, optional decimal point with optional fraction
const NUMBER_PATTERN: &str = r"[-+]?\d+\.?\d*";

/// A single X, Y, Z reading recovered from one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Extract a coordinate triple from raw recognized text.
///
/// Returns `None` when fewer than three numeric tokens survive
/// normalization; tokens beyond the first three are ignored.
pub fn extract_coordinates(text: &str) -> Option<Coordinates> {
    let cleaned = normalize(text);
    let anchored = strip_label(&cleaned);
    let tokens = scan_numbers(anchored);

    if tokens.len() < 3 {
        return None;
    }

    // The token grammar all but guarantees these parse; a lone sign or
    // similar edge case still degrades to no-match instead of panicking.
    let x = tokens[0].parse().ok()?;
    let y = tokens[1].parse().ok()?;
    let z = tokens[2].parse().ok()?;

    Some(Coordinates { x, y, z })
}

/// Drop whitespace and undo the OCR confusions common to the readout font.
///
/// Full-width colons and semicolons become ASCII colons, vertical bars are
/// dropped, letter I becomes digit 1 and letter O digit 0. Colon
/// normalization has to land before the colon split in `strip_label`.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(|c| match c {
            '：' | ';' => Some(':'),
            '|' => None,
            'I' => Some('1'),
            'O' => Some('0'),
            _ => Some(c),
        })
        .collect()
}

/// Keep only the text after the last colon, if any.
///
/// "label: value" readouts commonly misread the label; anchoring on the
/// last colon skips garbled label text even when OCR noise introduces
/// spurious earlier colons.
fn strip_label(text: &str) -> &str {
    match text.rfind(':') {
        Some(idx) => &text[idx + 1..],
        None => text,
    }
}

/// Scan for maximal numeric tokens, left to right.
///
/// Scanning rather than splitting: the separators between the numbers
/// (commas, spaces) are unreliable after OCR.
fn scan_numbers(text: &str) -> Vec<&str> {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_RE.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("valid number pattern"));
    re.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(text: &str) -> Option<(f64, f64, f64)> {
        extract_coordinates(text).map(|c| (c.x, c.y, c.z))
    }

    #[test]
    fn test_canonical_input() {
        assert_eq!(triple("12.5,-3,100"), Some((12.5, -3.0, 100.0)));
    }

    #[test]
    fn test_labeled_readout() {
        assert_eq!(
            triple("座標: 12.5, -3.0, 100.0"),
            Some((12.5, -3.0, 100.0))
        );
    }

    #[test]
    fn test_confusion_substitution_order() {
        // Semicolon becomes a colon before the split, so "12" is discarded
        // as label text; O becomes 0 before the scan.
        assert_eq!(triple("12;O.5, -3, 1OO"), Some((0.5, -3.0, 100.0)));
    }

    #[test]
    fn test_letter_i_and_bars() {
        // "I23" -> 123, bars dropped entirely.
        assert_eq!(triple("|I23, 64, -I|"), Some((123.0, 64.0, -1.0)));
    }

    #[test]
    fn test_fullwidth_colon() {
        assert_eq!(triple("座標：10, 20, 30"), Some((10.0, 20.0, 30.0)));
    }

    #[test]
    fn test_last_colon_wins() {
        // A spurious early colon must not defeat the real label anchor.
        assert_eq!(triple("a:b座標: 1, 2, 3"), Some((1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_no_numbers() {
        assert_eq!(triple("no numbers here"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(triple(""), None);
    }

    #[test]
    fn test_two_tokens_insufficient() {
        assert_eq!(triple("1, 2"), None);
    }

    #[test]
    fn test_three_tokens_boundary() {
        assert_eq!(triple("1, 2, 3"), Some((1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_extra_tokens_ignored() {
        assert_eq!(triple("1,2,3,4"), Some((1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_embedded_garbage() {
        // Unit markers and stray symbols between the digit runs.
        assert_eq!(triple("x=120.5m y=-33 z=781?"), Some((120.5, -33.0, 781.0)));
    }

    #[test]
    fn test_multiline_text() {
        assert_eq!(triple("座標:\n12, 64,\n-300"), Some((12.0, 64.0, -300.0)));
    }

    #[test]
    fn test_trailing_decimal_point() {
        // "12." is a valid token per the grammar and parses as 12.0.
        assert_eq!(triple("12., 3, 4"), Some((12.0, 3.0, 4.0)));
    }

    #[test]
    fn test_normalize_is_pure_cleanup() {
        assert_eq!(normalize(" 1 2 ; O | I "), "12:01");
        assert_eq!(normalize("座標： 5"), "座標:5");
    }

    #[test]
    fn test_strip_label() {
        assert_eq!(strip_label("座標:1,2,3"), "1,2,3");
        assert_eq!(strip_label("a:b:c"), "c");
        assert_eq!(strip_label("1,2,3"), "1,2,3");
        assert_eq!(strip_label("tail:"), "");
    }

    #[test]
    fn test_scan_numbers_tokens() {
        assert_eq!(scan_numbers("12.5,-3,+100"), vec!["12.5", "-3", "+100"]);
        assert_eq!(scan_numbers("abc"), Vec::<&str>::new());
    }
}
