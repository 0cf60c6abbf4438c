//! Secret code masking
//!
//! The masked form is computed once when an item is reported and stored next
//! to the secret; reads use the stored value and never mask again.

/// Character used for every hidden position
pub const MASK_CHAR: char = '*';

/// Number of trailing characters left visible
pub const VISIBLE_SUFFIX: usize = 4;

/// Replace all but the last four characters of `code` with `*`.
///
/// Codes shorter than four characters are returned unchanged. Lengths are
/// counted in characters, so the result always has as many characters as
/// the input.
pub fn mask_code(code: &str) -> String {
    let len = code.chars().count();
    if len < VISIBLE_SUFFIX {
        return code.to_string();
    }

    let hidden = len - VISIBLE_SUFFIX;
    let mut masked: String = std::iter::repeat(MASK_CHAR).take(hidden).collect();
    masked.extend(code.chars().skip(hidden));
    masked
}
