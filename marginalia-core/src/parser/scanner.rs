//! String-aware brace matching and Lua string unescaping
//!
//! Every higher-level extraction step rides on [`scan_table`]: it is the one
//! mechanism that knows how to find where a nested table literal ends without
//! being fooled by brace characters inside quoted strings.

use crate::error::{ParseError, Result};

/// Find the end of the table literal whose opening `{` sits at `open`.
///
/// Returns the offset one past the matching `}`. Nested tables are counted;
/// quoted string contents (single- or double-quoted, with backslash escapes)
/// are opaque, so braces inside them never affect the depth.
pub fn scan_table(src: &str, open: usize) -> Result<usize> {
    let bytes = src.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
                i += 1;
            }
            q @ (b'"' | b'\'') => {
                i = skip_string(src, i, q)?;
            }
            _ => i += 1,
        }
    }

    Err(ParseError::UnterminatedTable { offset: open })
}

/// Skip a quoted string whose opening quote sits at `open`.
///
/// Returns the offset one past the closing quote. A backslash escapes the
/// following byte, so `\"` and `\\` never terminate the string.
pub(crate) fn skip_string(src: &str, open: usize, quote: u8) -> Result<usize> {
    let bytes = src.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(ParseError::UnterminatedString { offset: open })
}

/// Expand Lua string escape sequences in the raw text between two quotes.
///
/// Recognizes `\n`, `\t`, `\r`, `\\`, `\"` and `\'`. Any other escape passes
/// through as a literal backslash plus the next character; this never fails.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            // trailing lone backslash
            None => out.push('\\'),
        }
    }
    out
}
