//! Annotation entry types and shape classification

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format KoReader writes into annotation entries.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The closed set of annotation shapes, plus the sentinel for entries that
/// match none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    /// Colored, positioned highlight with selected text
    Highlight,

    /// Text marking with no color (a textual bookmark/note)
    Bookmark,

    /// Colored, positioned highlight without any selected text
    HighlightEmpty,

    /// Colored marking with neither positions nor a page
    HighlightNoPosition,

    /// Entry matched no known shape; retained, never dropped
    Unclassified,
}

/// One highlight/bookmark/note entry from a metadata file.
///
/// All fields are optional at this layer and stored as found in the file.
/// `kind` is computed once at parse time from the field-presence fingerprint
/// and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserAnnotation {
    /// Selected/annotated text
    pub text: Option<String>,

    /// Chapter title the entry falls in
    pub chapter: Option<String>,

    /// Page number, from a numeric `page` field or from `pageno`
    pub page_number: Option<u32>,

    /// When the entry was made, from KoReader's fixed textual format
    pub datetime: Option<NaiveDateTime>,

    /// Highlight color name
    pub color: Option<String>,

    /// Highlight draw style (e.g. "lighten")
    pub drawer: Option<String>,

    /// Start position descriptor; device-internal, kept opaque
    pub pos0: Option<String>,

    /// End position descriptor; device-internal, kept opaque
    pub pos1: Option<String>,

    /// XPath-style page locator, when `page` holds a string
    pub page_xpath: Option<String>,

    /// Shape classification, fixed at parse time
    pub kind: HighlightKind,
}

impl ParserAnnotation {
    /// The equality key used to merge annotations contributed by multiple
    /// devices for the same book.
    pub fn dedupe_key(&self) -> (Option<&str>, Option<u32>) {
        (self.text.as_deref(), self.page_number)
    }
}

/// Which optional fields an entry carried, captured once per entry.
///
/// A string field that is present but empty counts as absent here. `page` is
/// true when the raw `page` field existed in either its string or numeric
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFingerprint {
    pub text: bool,
    pub color: bool,
    pub drawer: bool,
    pub pos0: bool,
    pub pos1: bool,
    pub page: bool,
}

impl FieldFingerprint {
    /// Classify an entry by field presence, evaluated in fixed precedence
    /// order. Pure: byte-identical entries always classify identically, and
    /// field order within the entry cannot matter.
    pub fn classify(self) -> HighlightKind {
        let Self {
            text,
            color,
            drawer,
            pos0,
            pos1,
            page,
        } = self;

        if color && drawer && pos0 && pos1 && text {
            HighlightKind::Highlight
        } else if !color && text {
            HighlightKind::Bookmark
        } else if color && (pos0 || pos1) && !text {
            HighlightKind::HighlightEmpty
        } else if color && !pos0 && !pos1 && !page {
            HighlightKind::HighlightNoPosition
        } else {
            HighlightKind::Unclassified
        }
    }
}
