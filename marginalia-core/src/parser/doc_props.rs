//! `doc_props` table parsing

use super::fields::{find_field, Entries, EntryKey, RawValue};
use crate::error::Result;
use crate::types::DocProps;

/// Parse the body of the `doc_props` table. Every field is optional; values
/// are kept as found.
pub(crate) fn parse_doc_props(body: &str) -> Result<DocProps> {
    let mut props = DocProps::default();

    if let Some(title) = find_field(body, "title")?.and_then(RawValue::string) {
        props.raw_title = title;
    }
    if let Some(authors) = find_field(body, "authors")?.and_then(RawValue::string) {
        props.raw_authors = authors;
    }
    props.language = find_field(body, "language")?.and_then(RawValue::string);
    props.description = find_field(body, "description")?.and_then(RawValue::string);
    props.series = find_field(body, "series")?.and_then(RawValue::string);

    if let Some(value) = find_field(body, "identifiers")? {
        match value {
            // scheme → id pairs, parsed with the same extractor recursively
            RawValue::Table(_) => {
                let inner = value.table_body().unwrap_or_default();
                for entry in Entries::new(inner) {
                    let (key, id) = entry?;
                    if let (EntryKey::Named(scheme), Some(id)) = (key, id.string()) {
                        props.identifiers.insert(scheme.to_string(), id);
                    }
                }
            }
            // some devices write identifiers as one opaque string; keep it
            RawValue::Str(_) => {
                if let Some(raw) = value.string() {
                    if !raw.is_empty() {
                        props.identifiers.insert("unspecified".to_string(), raw);
                    }
                }
            }
            RawValue::Scalar(_) => {}
        }
    }

    Ok(props)
}
