//! Brace-delimited block extraction.
//!
//! Finds the body of a `{ ... }` block, counting nested braces while
//! skipping over quoted strings, `//` line comments and `/* */` block
//! comments.

use std::ops::Range;

/// Extract the text between the brace at (or after) `offset` and its
/// matching closing brace. Returns an empty string when no opening brace
/// follows `offset` or the block is never closed.
pub fn extract_code(code: &str, offset: usize) -> &str {
    match block_span(code, offset) {
        Some(span) => &code[span],
        None => "",
    }
}

/// Byte range of the block body, braces excluded.
///
/// `offset` should point at the opening brace. If it does not, the scan
/// jumps to the next opening brace.
pub fn block_span(code: &str, offset: usize) -> Option<Range<usize>> {
    let bytes = code.as_bytes();
    let open = if bytes.get(offset) == Some(&b'{') {
        offset
    } else {
        offset + code.get(offset..)?.find('{')?
    };

    let start = open + 1;
    let mut cursor = start;
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut in_comment = false;

    while cursor < bytes.len() {
        let c = bytes[cursor];
        let next = bytes.get(cursor + 1).copied();
        let prev = bytes[cursor - 1];

        if quote.is_none() {
            if c == b'/' && next == Some(b'/') && !in_comment {
                // Line comment: swallow up to the newline
                cursor = code[cursor..]
                    .find('\n')
                    .map_or(bytes.len(), |i| cursor + i);
                continue;
            } else if c == b'/' && next == Some(b'*') {
                cursor += 2;
                in_comment = true;
                continue;
            } else if c == b'*' && next == Some(b'/') {
                cursor += 2;
                in_comment = false;
                continue;
            }
        }

        if !in_comment && (c == b'"' || c == b'\'') && prev != b'\\' {
            match quote {
                None => {
                    quote = Some(c);
                    cursor += 1;
                    continue;
                }
                Some(open_char) if open_char == c => {
                    quote = None;
                    cursor += 1;
                    continue;
                }
                Some(_) => {}
            }
        }

        if quote.is_none() && !in_comment {
            match c {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(start..cursor);
                    }
                }
                _ => {}
            }
        }

        cursor += 1;
    }

    None
}
