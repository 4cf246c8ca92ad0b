//! The per-book aggregate produced by the collector

use super::{DocProps, ParserAnnotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One deduplicated annotation plus the devices that contributed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedAnnotation {
    #[serde(flatten)]
    pub annotation: ParserAnnotation,

    /// Every device id that reported an annotation with this dedupe key
    pub devices: BTreeSet<String>,
}

/// One physical book, merged from every parsed file sharing its checksum.
///
/// `doc_props` fields are first-seen-wins across the contributing files in
/// scan order; annotations are deduplicated by `(text, page_number)` and kept
/// in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBook {
    pub checksum: String,
    pub doc_props: DocProps,
    pub annotations: Vec<TaggedAnnotation>,
}

impl AggregatedBook {
    /// Book title after the collector's folder-name fallback has applied.
    pub fn title(&self) -> &str {
        &self.doc_props.raw_title
    }

    /// Total annotations across all kinds.
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HighlightKind, ParserAnnotation};

    #[test]
    fn test_book_serialization() {
        let book = AggregatedBook {
            checksum: "abc123".into(),
            doc_props: DocProps {
                raw_title: "Dune".into(),
                ..Default::default()
            },
            annotations: vec![TaggedAnnotation {
                annotation: ParserAnnotation {
                    text: Some("Fear is the mind-killer".into()),
                    chapter: None,
                    page_number: Some(12),
                    datetime: None,
                    color: Some("yellow".into()),
                    drawer: Some("lighten".into()),
                    pos0: Some("p1".into()),
                    pos1: Some("p2".into()),
                    page_xpath: None,
                    kind: HighlightKind::Highlight,
                },
                devices: BTreeSet::from(["boox-palma".to_string()]),
            }],
        };

        let json = serde_json::to_string(&book).unwrap();
        let deserialized: AggregatedBook = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);

        // tagged annotations flatten: kind and devices sit side by side
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["annotations"][0]["kind"], "highlight");
        assert_eq!(value["annotations"][0]["devices"][0], "boox-palma");
    }
}
