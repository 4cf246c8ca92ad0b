//! Top-level field extraction over a table-literal body
//!
//! Works on the text strictly between a table's outer braces. Entries are
//! walked at brace depth zero only, so a `title` buried inside a sub-table
//! can never shadow the top-level `title`.

use super::scanner::{scan_table, skip_string, unescape};
use crate::error::Result;

/// How one entry in a table body is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKey<'a> {
    /// `name = v` or `["name"] = v`
    Named(&'a str),
    /// `[3] = v`
    Index(u64),
    /// bare value with no key
    Positional,
}

/// The raw textual span of one entry's value, classified by its leading
/// token only. Nothing inside is interpreted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawValue<'a> {
    /// A nested table literal, braces included
    Table(&'a str),
    /// Raw contents between the quotes, escapes not yet expanded
    Str(&'a str),
    /// A bare token: number, `true`, `false` or `nil`
    Scalar(&'a str),
}

impl<'a> RawValue<'a> {
    /// Body of a nested table, braces stripped.
    pub(crate) fn table_body(self) -> Option<&'a str> {
        match self {
            RawValue::Table(raw) => Some(&raw[1..raw.len() - 1]),
            _ => None,
        }
    }

    /// Logical string value, escapes expanded.
    pub(crate) fn string(self) -> Option<String> {
        match self {
            RawValue::Str(raw) => Some(unescape(raw)),
            _ => None,
        }
    }

    /// Unsigned integer value of a bare numeric token.
    pub(crate) fn integer(self) -> Option<u32> {
        match self {
            RawValue::Scalar(tok) => tok.parse().ok(),
            _ => None,
        }
    }

    /// Opaque textual form, for fields whose format is device-internal:
    /// strings are unescaped, scalars kept as written, tables kept verbatim
    /// with their braces.
    pub(crate) fn opaque(self) -> String {
        match self {
            RawValue::Str(raw) => unescape(raw),
            RawValue::Scalar(tok) => tok.to_string(),
            RawValue::Table(raw) => raw.to_string(),
        }
    }
}

/// Iterator over the top-level `key = value` entries of a table body.
pub(crate) struct Entries<'a> {
    body: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(body: &'a str) -> Self {
        Self {
            body,
            pos: 0,
            failed: false,
        }
    }

    fn skip_separators(&mut self) {
        let bytes = self.body.as_bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_whitespace() || bytes[self.pos] == b',')
        {
            self.pos += 1;
        }
    }

    /// Parse the key part at `self.pos`, leaving `self.pos` on the first
    /// byte after it. Returns `Positional` (without consuming) when the
    /// entry has no `key =` prefix.
    fn parse_key(&mut self) -> Result<EntryKey<'a>> {
        let bytes = self.body.as_bytes();
        let start = self.pos;

        if bytes[start] == b'[' {
            let mut i = start + 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                let name_start = i + 1;
                let after = skip_string(self.body, i, quote)?;
                let name = &self.body[name_start..after - 1];
                self.pos = self.body[after..]
                    .find(']')
                    .map(|off| after + off + 1)
                    .unwrap_or(after);
                return Ok(EntryKey::Named(name));
            }
            // [123] = ...
            if let Some(close) = self.body[start..].find(']') {
                let inner = self.body[start + 1..start + close].trim();
                if let Ok(n) = inner.parse::<u64>() {
                    self.pos = start + close + 1;
                    return Ok(EntryKey::Index(n));
                }
            }
            return Ok(EntryKey::Positional);
        }

        if bytes[start].is_ascii_alphabetic() || bytes[start] == b'_' {
            let mut i = start;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            // only a key if an `=` follows; `true`/`nil` here would be a value
            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'=' {
                let name = &self.body[start..i];
                self.pos = i;
                return Ok(EntryKey::Named(name));
            }
        }

        Ok(EntryKey::Positional)
    }

    /// Parse the value span starting at `self.pos`, leaving `self.pos` one
    /// past it.
    fn parse_value(&mut self) -> Result<RawValue<'a>> {
        let bytes = self.body.as_bytes();
        let start = self.pos;

        match bytes[start] {
            b'{' => {
                let end = scan_table(self.body, start)?;
                self.pos = end;
                Ok(RawValue::Table(&self.body[start..end]))
            }
            q @ (b'"' | b'\'') => {
                let end = skip_string(self.body, start, q)?;
                self.pos = end;
                Ok(RawValue::Str(&self.body[start + 1..end - 1]))
            }
            _ => {
                let mut i = start;
                while i < bytes.len() && bytes[i] != b',' && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                // always make progress, even on a stray delimiter
                if i == start {
                    i += 1;
                }
                self.pos = i;
                Ok(RawValue::Scalar(self.body[start..i].trim()))
            }
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<(EntryKey<'a>, RawValue<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_separators();
        if self.pos >= self.body.len() {
            return None;
        }

        let step = (|| {
            let key = self.parse_key()?;

            // consume `=` between key and value
            let bytes = self.body.as_bytes();
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_whitespace() || bytes[self.pos] == b'=')
            {
                self.pos += 1;
            }
            if self.pos >= bytes.len() {
                return Ok(None);
            }

            let value = self.parse_value()?;
            Ok(Some((key, value)))
        })();

        match step {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Find the top-level field `name` in a table body.
///
/// Absence is not a failure; only a structurally broken body errors. Matches
/// both the `name = v` and `["name"] = v` spellings, and never matches a
/// same-named field inside a nested table.
pub(crate) fn find_field<'a>(body: &'a str, name: &str) -> Result<Option<RawValue<'a>>> {
    for entry in Entries::new(body) {
        let (key, value) = entry?;
        if let EntryKey::Named(n) = key {
            if n == name {
                return Ok(Some(value));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_bracketed_and_bare_keys() {
        let body = r#" ["title"] = "Dune", pageno = 12, ok = true "#;
        assert_eq!(
            find_field(body, "title").unwrap().unwrap().string().unwrap(),
            "Dune"
        );
        assert_eq!(
            find_field(body, "pageno").unwrap().unwrap().integer(),
            Some(12)
        );
        assert_eq!(
            find_field(body, "ok").unwrap().unwrap(),
            RawValue::Scalar("true")
        );
    }

    #[test]
    fn absent_field_is_none_not_error() {
        assert!(find_field("a = 1", "missing").unwrap().is_none());
        assert!(find_field("", "missing").unwrap().is_none());
    }

    #[test]
    fn nested_fields_do_not_shadow_top_level() {
        let body = r#" inner = { title = "wrong" }, ["title"] = "right" "#;
        assert_eq!(
            find_field(body, "title").unwrap().unwrap().string().unwrap(),
            "right"
        );
        // and a field that only exists nested is not found at top level
        assert!(find_field(body, "missing").unwrap().is_none());
        let body2 = r#" inner = { only_nested = 1 } "#;
        assert!(find_field(body2, "only_nested").unwrap().is_none());
    }

    #[test]
    fn value_spans_cover_nested_tables() {
        let body = r#" props = { a = { b = 2 }, c = "x" }, tail = 1 "#;
        let props = find_field(body, "props").unwrap().unwrap();
        let inner = props.table_body().unwrap();
        assert!(find_field(inner, "c").unwrap().is_some());
        assert_eq!(find_field(body, "tail").unwrap().unwrap().integer(), Some(1));
    }

    #[test]
    fn indexed_entries_enumerate_in_order() {
        let body = r#" [1] = { n = 1 }, [2] = { n = 2 }, [3] = { n = 3 } "#;
        let keys: Vec<_> = Entries::new(body)
            .map(|e| e.unwrap().0)
            .collect();
        assert_eq!(
            keys,
            vec![EntryKey::Index(1), EntryKey::Index(2), EntryKey::Index(3)]
        );
    }

    #[test]
    fn commas_inside_strings_do_not_split_entries() {
        let body = r#" text = "a, b, c", next = 2 "#;
        assert_eq!(
            find_field(body, "text").unwrap().unwrap().string().unwrap(),
            "a, b, c"
        );
        assert_eq!(find_field(body, "next").unwrap().unwrap().integer(), Some(2));
    }

    #[test]
    fn broken_nested_table_propagates_scanner_error() {
        let body = r#" props = { never closed "#;
        assert!(find_field(body, "anything").is_err());
    }

    #[test]
    fn opaque_keeps_table_values_verbatim() {
        let body = r#" pos0 = { x = 10, y = 20, page = 3 } "#;
        let v = find_field(body, "pos0").unwrap().unwrap();
        assert_eq!(v.opaque(), "{ x = 10, y = 20, page = 3 }");
    }
}
