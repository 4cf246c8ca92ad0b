//! The per-file parse result

use super::{DocProps, HighlightKind, ParserAnnotation};
use crate::error::ParseWarning;
use serde::{Deserialize, Serialize};

/// Everything extracted from one metadata file.
///
/// Immutable once built; a pure function of the file text except for
/// `source_path` and `device_id`, which the caller supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Book identity key; two files with equal checksum are the same
    /// physical book regardless of device or folder
    pub checksum: String,

    /// Book-level metadata, empty when the file carried none
    pub doc_props: DocProps,

    /// Annotation entries in file order
    pub annotations: Vec<ParserAnnotation>,

    /// Path the file was read from
    pub source_path: String,

    /// Device that produced the file, derived from the path by the caller
    pub device_id: String,

    /// Non-fatal degradations hit while parsing
    pub warnings: Vec<ParseWarning>,
}

impl ParsedFile {
    /// Number of entries that matched no known shape.
    pub fn unclassified_count(&self) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.kind == HighlightKind::Unclassified)
            .count()
    }
}
