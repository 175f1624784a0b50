//! Character-offset helpers and whitespace cleanup.
//!
//! Entity offsets are character offsets, while `str` slicing and regex
//! matches work in bytes; everything that crosses that line goes through here.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_idx`-th character (or `text.len()` past the end).
pub fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Character offset of a byte index that lies on a char boundary.
pub fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Slice by character offsets, saturating at the end of `text`.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let end = end.max(start);
    let b_start = byte_index(text, start);
    let b_end = byte_index(text, end);
    &text[b_start..b_end]
}

/// Trim and collapse every whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
