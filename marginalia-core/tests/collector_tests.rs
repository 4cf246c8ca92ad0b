//! Collector tests over real files on disk

use marginalia_core::collector::{collect_entries, ScanEntry};
use marginalia_core::{HighlightKind, ParseError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_sidecar(root: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = root.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn dune_metadata(title: &str) -> String {
    format!(
        r#"-- KoReader sidecar
return {{
    ["partial_md5_checksum"] = "abc123",
    ["doc_props"] = {{
        ["authors"] = "Frank Herbert",
        ["title"] = "{title}",
    }},
    ["annotations"] = {{
        [1] = {{
            ["color"] = "yellow",
            ["drawer"] = "lighten",
            ["pos0"] = "p1",
            ["pos1"] = "p2",
            ["text"] = "Fear is the mind-killer",
            ["pageno"] = 12,
            ["datetime"] = "2024-01-15 10:30:00",
        }},
    }},
}}
"#
    )
}

#[test]
fn same_book_from_two_devices_merges() {
    let root = TempDir::new().unwrap();
    let a = write_sidecar(&root, "boox-palma/Dune.sdr/metadata.epub.lua", &dune_metadata("Dune"));
    let b = write_sidecar(&root, "s24u/Dune.sdr/metadata.epub.lua", &dune_metadata(""));

    let report = collect_entries(&[
        ScanEntry::new(a, "boox-palma"),
        ScanEntry::new(b, "s24u"),
    ]);

    assert_eq!(report.files_processed, 2);
    assert_eq!(report.files_failed(), 0);
    assert_eq!(report.books.len(), 1);

    let book = &report.books[0];
    assert_eq!(book.checksum, "abc123");
    assert_eq!(book.title(), "Dune");
    assert_eq!(book.annotations.len(), 1);

    let tagged = &book.annotations[0];
    assert_eq!(tagged.annotation.kind, HighlightKind::Highlight);
    assert!(tagged.devices.contains("boox-palma"));
    assert!(tagged.devices.contains("s24u"));
}

#[test]
fn broken_file_is_reported_while_siblings_parse() {
    let root = TempDir::new().unwrap();
    let good = write_sidecar(&root, "dev/Dune.sdr/metadata.epub.lua", &dune_metadata("Dune"));
    // outermost literal missing its closing brace
    let bad = write_sidecar(
        &root,
        "dev/Broken.sdr/metadata.epub.lua",
        "return { [\"partial_md5_checksum\"] = \"bad\", ",
    );

    let report = collect_entries(&[
        ScanEntry::new(bad.clone(), "dev"),
        ScanEntry::new(good, "dev"),
    ]);

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_failed(), 1);
    assert_eq!(report.failures[0].path, bad);
    assert!(matches!(
        report.failures[0].error,
        ParseError::UnterminatedTable { .. }
    ));
    // the good sibling still made it into the aggregate
    assert_eq!(report.books.len(), 1);
    assert_eq!(report.books[0].title(), "Dune");
}

#[test]
fn missing_file_surfaces_as_io_failure() {
    let report = collect_entries(&[ScanEntry::new("/nonexistent/metadata.epub.lua", "dev")]);
    assert_eq!(report.files_processed, 0);
    assert_eq!(report.files_failed(), 1);
    assert!(matches!(report.failures[0].error, ParseError::Io(_)));
}

#[test]
fn fallback_title_comes_from_sdr_folder() {
    let root = TempDir::new().unwrap();
    let path = write_sidecar(
        &root,
        "dev/Children_of_Dune.sdr/metadata.epub.lua",
        &dune_metadata(""),
    );

    let report = collect_entries(&[ScanEntry::new(path, "dev")]);
    assert_eq!(report.books[0].title(), "Children of Dune");
}

#[test]
fn report_counts_unclassified_annotations() {
    let root = TempDir::new().unwrap();
    let path = write_sidecar(
        &root,
        "dev/Odd.sdr/metadata.epub.lua",
        r#"return {
            ["partial_md5_checksum"] = "odd1",
            ["annotations"] = {
                [1] = { ["color"] = "blue", ["page"] = 7 },
                [2] = { ["text"] = "fine bookmark" },
            },
        }"#,
    );

    let report = collect_entries(&[ScanEntry::new(path, "dev")]);
    assert_eq!(report.unclassified_annotations, 1);
    assert_eq!(report.books[0].annotations.len(), 2);
}
