//! Fitting survey text into the classifier's per-request byte budget.

/// Maximum UTF-8 bytes the classifier accepts per request.
pub const CLASSIFIER_MAX_BYTES: usize = 5000;

/// Returns the longest prefix of `text` that fits in `max_bytes` bytes
/// without splitting a code point.
///
/// Text that already fits is returned unmodified. Otherwise the text is
/// cut at `max_bytes` and any trailing partial UTF-8 sequence is dropped.
#[must_use]
pub fn truncate_to_byte_budget(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    // Index 0 is always a char boundary, so this terminates.
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.get(..end).unwrap_or_default()
}
