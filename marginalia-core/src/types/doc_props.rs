//! Book-level metadata as found in a file's `doc_props` table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Book-level metadata, kept exactly as found in the file.
///
/// No cleaning or normalization happens at this layer; `raw_title` and
/// `raw_authors` keep whatever the device wrote, including embedded escapes
/// already expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocProps {
    /// Title as written by the device
    pub raw_title: String,

    /// Authors string as written by the device
    pub raw_authors: String,

    /// Identifier scheme → id (isbn, mobi-asin, ...)
    pub identifiers: BTreeMap<String, String>,

    /// Language code, when present
    pub language: Option<String>,

    /// Description/summary, when present
    pub description: Option<String>,

    /// Series name, when present
    pub series: Option<String>,
}

impl DocProps {
    /// True when every field is empty/absent.
    pub fn is_empty(&self) -> bool {
        self.raw_title.is_empty()
            && self.raw_authors.is_empty()
            && self.identifiers.is_empty()
            && self.language.is_none()
            && self.description.is_none()
            && self.series.is_none()
    }

    /// Fill fields that are still empty here from `other`. Used by the
    /// collector for its first-seen-wins merge: fields already set are never
    /// overwritten.
    pub fn fill_missing_from(&mut self, other: &DocProps) {
        if self.raw_title.is_empty() {
            self.raw_title = other.raw_title.clone();
        }
        if self.raw_authors.is_empty() {
            self.raw_authors = other.raw_authors.clone();
        }
        if self.identifiers.is_empty() {
            self.identifiers = other.identifiers.clone();
        }
        if self.language.is_none() {
            self.language = other.language.clone();
        }
        if self.description.is_none() {
            self.description = other.description.clone();
        }
        if self.series.is_none() {
            self.series = other.series.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_missing_never_overwrites() {
        let mut first = DocProps {
            raw_title: "Dune".into(),
            ..Default::default()
        };
        let second = DocProps {
            raw_title: "Dune (retail)".into(),
            raw_authors: "Frank Herbert".into(),
            language: Some("en".into()),
            ..Default::default()
        };

        first.fill_missing_from(&second);
        assert_eq!(first.raw_title, "Dune");
        assert_eq!(first.raw_authors, "Frank Herbert");
        assert_eq!(first.language.as_deref(), Some("en"));
    }

    #[test]
    fn empty_props_report_empty() {
        assert!(DocProps::default().is_empty());
        let props = DocProps {
            language: Some("en".into()),
            ..Default::default()
        };
        assert!(!props.is_empty());
    }
}
