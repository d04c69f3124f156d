//! Splits long text into bounded segments for Notion rich-text blocks.
//!
//! Notion rejects a single text object longer than 2000 characters, so an
//! email body is attached as a run of paragraphs, each holding one chunk.
//! Cuts prefer the last line break inside the window, then the last space,
//! and only fall back to a hard cut when the window holds neither.

/// Per-block character limit enforced by the Notion API.
pub const DEFAULT_MAX_LEN: usize = 2000;

/// Splits `text` into chunks of at most `max_len` characters.
///
/// Lengths are counted in `char`s. Whitespace cuts drop the separator and
/// the remainder is trimmed before the next window is measured. A `max_len`
/// of zero is treated as one so the loop always makes progress.
#[must_use]
pub fn chunk(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        // Byte offset of the char at index `max_len`, if the text is that long.
        let Some((limit, _)) = rest.char_indices().nth(max_len) else {
            chunks.push(rest.to_string());
            break;
        };

        // The char at index `max_len` itself is a legal separator position.
        let window_end = limit + rest[limit..].chars().next().map_or(0, char::len_utf8);
        let window = &rest[..window_end];

        let cut = window.rfind('\n').or_else(|| window.rfind(' ')).unwrap_or(limit);

        let head = &rest[..cut];
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        // A cut at 0 sits on whitespace, which the trim removes.
        rest = rest[cut..].trim();
    }

    chunks
}

/// Splits `text` using [`DEFAULT_MAX_LEN`].
#[must_use]
pub fn chunk_default(text: &str) -> Vec<String> {
    chunk(text, DEFAULT_MAX_LEN)
}
