//! Error types for Marginalia Core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using ParseError
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that are fatal to parsing one metadata file.
///
/// Scanner-level errors (`UnterminatedTable`, `UnterminatedString`) mean the
/// file is structurally broken and nothing in it can be trusted. File-level
/// errors (`NotATableLiteral`, `MissingChecksum`) mean the file is not a
/// usable metadata file. None of these ever aborts a whole scan; the
/// collector records them per file and keeps going.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unterminated table literal opened at byte {offset}")]
    UnterminatedTable { offset: usize },

    #[error("unterminated string literal opened at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("no outermost table literal found")]
    NotATableLiteral,

    #[error("missing partial_md5_checksum field")]
    MissingChecksum,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal degradations recorded while parsing one file.
///
/// These never fail the file; the affected field or entry degrades and the
/// warning is carried on the resulting [`ParsedFile`](crate::ParsedFile).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum ParseWarning {
    /// Annotation entry matched none of the four known shapes; kept with the
    /// `Unclassified` sentinel kind.
    #[error("annotation entry {index} matches no known shape")]
    UnclassifiedAnnotation { index: usize },

    /// `datetime` field did not parse; the annotation keeps no timestamp.
    #[error("annotation entry {index} has malformed timestamp {raw:?}")]
    MalformedTimestamp { index: usize, raw: String },

    /// File carried no `doc_props` table; empty metadata substituted.
    #[error("file has no doc_props table")]
    MissingDocProps,
}
