//! Hexadecimal codepoint text and the private-use range tables.

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// An inclusive range of codepoints, written as hexadecimal text.
pub type HexRange = (&'static str, &'static str);

/// The three Private Use Areas.
pub const PRIVATE_USE_RANGES: &[HexRange] = &[
    ("E000", "F8FF"),
    ("F0000", "FFFFD"),
    ("100000", "10FFFD"),
];

/// The parts of the Private Use Areas that users may claim for their own
/// characters. `F000..F8FF` is left out, it is reserved by platform vendors
/// and consortium convention.
pub const CUSTOM_PUA_RANGES: &[HexRange] = &[
    ("E000", "EFFF"),
    ("F0000", "FFFFD"),
    ("100000", "10FFFD"),
];

/// UTF-16 surrogate codepoints.
pub const SURROGATE_RANGES: &[HexRange] = &[("D800", "DFFF")];

/// Every codepoint a custom character record may describe.
pub const VALID_CODEPOINT_RANGE: HexRange = ("0000", "10FFFD");

/// Parses hexadecimal codepoint text, with or without a `U+` prefix.
pub fn parse_codepoint(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 8 {
        return Err(Error::InvalidCodepoint(text.to_owned()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidCodepoint(text.to_owned()))
}

/// Formats a codepoint as upper-case hex, zero-padded to at least four digits.
pub fn format_codepoint(cp: u32) -> String {
    format!("{:04X}", cp)
}

/// Normalises codepoint text to the form `format_codepoint` produces.
pub fn normalize_codepoint(text: &str) -> Result<String> {
    parse_codepoint(text).map(format_codepoint)
}

/// Compares two hexadecimal numbers given as text.
///
/// Leading zeros are stripped, then the shorter number is the smaller one;
/// numbers of equal length compare lexically (case-insensitively).
pub fn compare_hex(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0').to_ascii_uppercase();
    let b = b.trim_start_matches('0').to_ascii_uppercase();
    a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
}

/// Whether `code` lies inside `range`, bounds included.
pub fn in_range(code: &str, range: HexRange) -> bool {
    compare_hex(code, range.0) != Ordering::Less && compare_hex(code, range.1) != Ordering::Greater
}

/// Whether `code` lies inside any of `ranges`.
pub fn in_ranges(code: &str, ranges: &[HexRange]) -> bool {
    ranges.iter().any(|&range| in_range(code, range))
}

/// Whether `code` is a Private Use codepoint.
pub fn is_private_use(code: &str) -> bool {
    in_ranges(code, PRIVATE_USE_RANGES)
}

/// Whether `code` is in a Private Use range open to user-defined characters.
pub fn is_custom_pua(code: &str) -> bool {
    in_ranges(code, CUSTOM_PUA_RANGES)
}

/// Whether `code` is a UTF-16 surrogate.
pub fn is_surrogate(code: &str) -> bool {
    in_ranges(code, SURROGATE_RANGES)
}

/// Whether `code` is in `0000..=10FFFD`.
pub fn is_valid_codepoint(code: &str) -> bool {
    in_range(code, VALID_CODEPOINT_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_hex() {
        assert_eq!(Ordering::Equal, compare_hex("00E000", "e000"));
        assert_eq!(Ordering::Less, compare_hex("FFFF", "10000"));
        assert_eq!(Ordering::Greater, compare_hex("F900", "F8FF"));
    }

    #[test]
    fn test_private_use_boundaries() {
        assert!(is_private_use("E000"));
        assert!(is_private_use("F8FF"));
        assert!(!is_private_use("F900"));
        assert!(!is_private_use("DFFF"));
        assert!(is_private_use("10FFFD"));
        assert!(!is_private_use("10FFFE"));
    }

    #[test]
    fn test_custom_pua_excludes_vendor_block() {
        assert!(is_custom_pua("EFFF"));
        assert!(!is_custom_pua("F000"));
        assert!(!is_custom_pua("F8FF"));
        assert!(is_custom_pua("F0000"));
    }

    #[test]
    fn test_surrogates_are_only_surrogates() {
        for code in ["D800", "DBFF", "DC00", "DFFF"] {
            assert!(is_surrogate(code));
            assert!(!is_private_use(code));
            assert!(!is_custom_pua(code));
        }
        assert!(!is_surrogate("D7FF"));
        assert!(!is_surrogate("E000"));
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(0x41, parse_codepoint("U+0041").unwrap());
        assert_eq!("0041", format_codepoint(0x41));
        assert_eq!("10FFFD", normalize_codepoint("10fffd").unwrap());
        assert!(parse_codepoint("xyz").is_err());
        assert!(parse_codepoint("").is_err());
        assert!(is_valid_codepoint("0000"));
        assert!(!is_valid_codepoint("110000"));
    }
}
