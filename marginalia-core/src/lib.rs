//! Marginalia Core Library
//!
//! This crate parses KoReader metadata sidecar files (`metadata.*.lua`) into
//! typed records and aggregates records from many devices into one canonical
//! book per checksum, with deduplicated, device-tagged annotations.
//!
//! Parsing one file is a pure function of its text; the collector's merge is
//! a deterministic single-threaded fold, so callers are free to parse many
//! files in parallel and merge the outcomes afterwards.

pub mod collector;
pub mod error;
pub mod parser;
pub mod types;

pub use collector::{aggregate, aggregate_outcomes, collect_entries, FileFailure, ScanEntry, ScanReport};
pub use error::{ParseError, ParseWarning, Result};
pub use parser::{parse_metadata_file, parse_metadata_str};
pub use types::{
    AggregatedBook, DocProps, FieldFingerprint, HighlightKind, ParsedFile, ParserAnnotation,
    TaggedAnnotation,
};
