//! Inspect command implementation

use anyhow::{Context, Result};
use marginalia_core::{parse_metadata_file, HighlightKind};
use std::path::Path;

/// Display information about one metadata file
pub fn inspect(input: &str, device: &str, json: bool) -> Result<()> {
    let path = Path::new(input);
    let parsed = parse_metadata_file(path, device)
        .with_context(|| format!("Failed to parse {}", input))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    println!("Checksum:    {}", parsed.checksum);
    if !parsed.doc_props.raw_title.is_empty() {
        println!("Title:       {}", parsed.doc_props.raw_title);
    }
    if !parsed.doc_props.raw_authors.is_empty() {
        println!("Authors:     {}", parsed.doc_props.raw_authors);
    }
    if let Some(language) = &parsed.doc_props.language {
        println!("Language:    {}", language);
    }
    for (scheme, id) in &parsed.doc_props.identifiers {
        println!("Identifier:  {}: {}", scheme, id);
    }
    println!("Annotations: {}", parsed.annotations.len());

    let count = |kind: HighlightKind| {
        parsed
            .annotations
            .iter()
            .filter(|a| a.kind == kind)
            .count()
    };
    println!("  highlights:    {}", count(HighlightKind::Highlight));
    println!("  bookmarks:     {}", count(HighlightKind::Bookmark));
    println!("  empty:         {}", count(HighlightKind::HighlightEmpty));
    println!("  no position:   {}", count(HighlightKind::HighlightNoPosition));
    println!("  unclassified:  {}", count(HighlightKind::Unclassified));

    if !parsed.warnings.is_empty() {
        println!("Warnings:");
        for warning in &parsed.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
