//! Annotation table parsing and shape classification

use super::fields::{find_field, Entries, RawValue};
use crate::error::{ParseWarning, Result};
use crate::types::{FieldFingerprint, HighlightKind, ParserAnnotation, DATETIME_FORMAT};
use chrono::NaiveDateTime;

/// Annotations plus the non-fatal warnings hit while reading them.
#[derive(Debug, Default)]
pub(crate) struct AnnotationList {
    pub annotations: Vec<ParserAnnotation>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse the body of the `annotations` table: every top-level entry that is
/// itself a table literal, in file order.
pub(crate) fn parse_annotations(body: &str) -> Result<AnnotationList> {
    let mut list = AnnotationList::default();

    let mut index = 0usize;
    for entry in Entries::new(body) {
        let (_, value) = entry?;
        let Some(entry_body) = value.table_body() else {
            continue;
        };
        let annotation = parse_entry(entry_body, index, &mut list.warnings)?;
        list.annotations.push(annotation);
        index += 1;
    }

    Ok(list)
}

/// A string field, treating present-but-empty as the value it is. Presence
/// for classification is decided separately.
fn string_field(body: &str, name: &str) -> Result<Option<String>> {
    Ok(find_field(body, name)?.and_then(RawValue::string))
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

fn parse_entry(
    body: &str,
    index: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Result<ParserAnnotation> {
    let text = string_field(body, "text")?;
    let chapter = string_field(body, "chapter")?;
    let color = string_field(body, "color")?;
    let drawer = string_field(body, "drawer")?;
    let pos0 = find_field(body, "pos0")?.map(RawValue::opaque);
    let pos1 = find_field(body, "pos1")?.map(RawValue::opaque);

    // `page` is either an xpath-like locator (string) or a plain number,
    // depending on the document format; `pageno` always wins for the number.
    let mut page_xpath = None;
    let mut page_number = None;
    let page_field = find_field(body, "page")?;
    if let Some(value) = page_field {
        match value {
            RawValue::Str(_) => page_xpath = value.string(),
            RawValue::Scalar(_) => page_number = value.integer(),
            RawValue::Table(_) => {}
        }
    }
    if let Some(n) = find_field(body, "pageno")?.and_then(RawValue::integer) {
        page_number = Some(n);
    }

    let datetime = match string_field(body, "datetime")? {
        Some(raw) => match NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT) {
            Ok(dt) => Some(dt),
            Err(_) => {
                tracing::warn!(index, raw = raw.as_str(), "malformed annotation timestamp");
                warnings.push(ParseWarning::MalformedTimestamp { index, raw });
                None
            }
        },
        None => None,
    };

    let fingerprint = FieldFingerprint {
        text: present(&text),
        color: present(&color),
        drawer: present(&drawer),
        pos0: present(&pos0),
        pos1: present(&pos1),
        page: page_field.is_some(),
    };
    let kind = fingerprint.classify();
    if kind == HighlightKind::Unclassified {
        tracing::warn!(index, "annotation entry matches no known shape, kept as unclassified");
        warnings.push(ParseWarning::UnclassifiedAnnotation { index });
    }

    Ok(ParserAnnotation {
        text,
        chapter,
        page_number,
        datetime,
        color,
        drawer,
        pos0,
        pos1,
        page_xpath,
        kind,
    })
}
