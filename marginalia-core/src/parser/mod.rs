//! Parser for KoReader metadata sidecar files
//!
//! A metadata file is a few `--` comment lines, a `return` keyword, and one
//! outermost table literal. The format is a small fixed subset of Lua table
//! syntax, hand-matched here rather than fed to a general Lua parser: real
//! device output carries quirks a strict grammar would reject, and nothing
//! beyond literals ever appears.

mod annotations;
mod doc_props;
mod fields;
mod scanner;

pub use scanner::{scan_table, unescape};

use crate::error::{ParseError, ParseWarning, Result};
use crate::types::{DocProps, ParsedFile};
use annotations::parse_annotations;
use doc_props::parse_doc_props;
use fields::{find_field, RawValue};
use std::fs;
use std::path::Path;

/// Read and parse one metadata file.
///
/// `device_id` comes from the caller (it is derived from where the file was
/// found, never from file content).
pub fn parse_metadata_file(path: &Path, device_id: &str) -> Result<ParsedFile> {
    let text = fs::read_to_string(path)?;
    parse_metadata_str(&text, &path.to_string_lossy(), device_id)
}

/// Parse metadata file text. Pure: the result depends only on the arguments.
pub fn parse_metadata_str(text: &str, source_path: &str, device_id: &str) -> Result<ParsedFile> {
    let open = find_root_table(text).ok_or(ParseError::NotATableLiteral)?;
    let end = scan_table(text, open)?;
    let body = &text[open + 1..end - 1];

    // checksum is the book identity key; the only field whose absence is fatal
    let checksum = find_field(body, "partial_md5_checksum")?
        .and_then(RawValue::string)
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingChecksum)?;

    let mut warnings = Vec::new();

    let doc_props = match find_field(body, "doc_props")? {
        Some(value @ RawValue::Table(_)) => {
            parse_doc_props(value.table_body().unwrap_or_default())?
        }
        _ => {
            tracing::debug!(source_path, "file has no doc_props table");
            warnings.push(ParseWarning::MissingDocProps);
            DocProps::default()
        }
    };

    let annotations = match find_field(body, "annotations")? {
        Some(value @ RawValue::Table(_)) => {
            let list = parse_annotations(value.table_body().unwrap_or_default())?;
            warnings.extend(list.warnings);
            list.annotations
        }
        _ => Vec::new(),
    };

    Ok(ParsedFile {
        checksum,
        doc_props,
        annotations,
        source_path: source_path.to_string(),
        device_id: device_id.to_string(),
        warnings,
    })
}

/// Offset of the opening brace of the outermost table literal.
///
/// Skips `--` line comments so a brace inside a comment cannot start the
/// scan; the `return` keyword falls out of the same walk.
fn find_root_table(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => return Some(i),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    None
}
