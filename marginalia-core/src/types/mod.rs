//! Core data types for parsed metadata files and aggregated books

mod annotation;
mod book;
mod doc_props;
mod parsed_file;

pub use annotation::{FieldFingerprint, HighlightKind, ParserAnnotation, DATETIME_FORMAT};
pub use book::{AggregatedBook, TaggedAnnotation};
pub use doc_props::DocProps;
pub use parsed_file::ParsedFile;
