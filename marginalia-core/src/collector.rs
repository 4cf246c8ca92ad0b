//! Aggregation of parsed files into per-book collections
//!
//! The collector consumes `(path, device_id)` pairs resolved by the caller,
//! parses each file independently, and folds the successes into one
//! accumulator per checksum. One file's failure never aborts the batch; it
//! is reported alongside the successes.

use crate::error::{ParseError, ParseWarning};
use crate::parser::parse_metadata_file;
use crate::types::{AggregatedBook, DocProps, ParsedFile, TaggedAnnotation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// One input to a scan: a metadata file plus the device it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub device_id: String,
}

impl ScanEntry {
    pub fn new(path: impl Into<PathBuf>, device_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            device_id: device_id.into(),
        }
    }
}

/// A file that failed to parse, with the reason.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ParseError,
}

/// Everything a scan produced: aggregated books in first-seen checksum
/// order, per-file failures, and the headline counts.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub books: Vec<AggregatedBook>,
    pub failures: Vec<FileFailure>,
    pub files_processed: usize,
    pub unclassified_annotations: usize,
    pub warnings: Vec<(PathBuf, ParseWarning)>,
}

impl ScanReport {
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }
}

/// Parse every entry sequentially and aggregate the results.
///
/// Callers that parse in parallel (parsing is a pure function per file) can
/// instead feed their own outcomes to [`aggregate_outcomes`] for the
/// single-threaded merge.
pub fn collect_entries(entries: &[ScanEntry]) -> ScanReport {
    let outcomes = entries
        .iter()
        .map(|entry| {
            (
                entry.path.clone(),
                parse_metadata_file(&entry.path, &entry.device_id),
            )
        })
        .collect();
    aggregate_outcomes(outcomes)
}

/// Fold per-file parse outcomes into the final report. Deterministic for a
/// given outcome sequence: books keep first-seen checksum order, annotations
/// keep first-occurrence dedupe-key order.
pub fn aggregate_outcomes(
    outcomes: Vec<(PathBuf, Result<ParsedFile, ParseError>)>,
) -> ScanReport {
    let mut report = ScanReport::default();

    let mut order: Vec<String> = Vec::new();
    let mut builders: HashMap<String, BookBuilder> = HashMap::new();

    for (path, outcome) in outcomes {
        match outcome {
            Ok(parsed) => {
                report.files_processed += 1;
                report.unclassified_annotations += parsed.unclassified_count();
                for warning in &parsed.warnings {
                    report.warnings.push((path.clone(), warning.clone()));
                }

                let builder = builders
                    .entry(parsed.checksum.clone())
                    .or_insert_with(|| {
                        order.push(parsed.checksum.clone());
                        BookBuilder::new(parsed.checksum.clone(), path.clone())
                    });
                builder.fold(&parsed);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unparseable file");
                report.failures.push(FileFailure { path, error });
            }
        }
    }

    report.books = order
        .into_iter()
        .filter_map(|checksum| builders.remove(&checksum))
        .map(BookBuilder::finish)
        .collect();
    report
}

/// Aggregate already-parsed files; convenience for callers that did their
/// own IO.
pub fn aggregate(files: impl IntoIterator<Item = ParsedFile>) -> Vec<AggregatedBook> {
    let outcomes = files
        .into_iter()
        .map(|f| (PathBuf::from(&f.source_path), Ok(f)))
        .collect();
    aggregate_outcomes(outcomes).books
}

/// Per-checksum accumulator threaded through the merge pass.
struct BookBuilder {
    checksum: String,
    doc_props: DocProps,
    first_path: PathBuf,
    annotations: Vec<TaggedAnnotation>,
    by_key: HashMap<(Option<String>, Option<u32>), usize>,
}

impl BookBuilder {
    fn new(checksum: String, first_path: PathBuf) -> Self {
        Self {
            checksum,
            doc_props: DocProps::default(),
            first_path,
            annotations: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    fn fold(&mut self, file: &ParsedFile) {
        // first-seen-wins per field, in scan order
        self.doc_props.fill_missing_from(&file.doc_props);

        for annotation in &file.annotations {
            let key = (annotation.text.clone(), annotation.page_number);
            match self.by_key.get(&key) {
                Some(&i) => {
                    // duplicate across devices: union the tags, keep the
                    // first occurrence's fields and kind
                    self.annotations[i].devices.insert(file.device_id.clone());
                }
                None => {
                    self.by_key.insert(key, self.annotations.len());
                    self.annotations.push(TaggedAnnotation {
                        annotation: annotation.clone(),
                        devices: BTreeSet::from([file.device_id.clone()]),
                    });
                }
            }
        }
    }

    fn finish(self) -> AggregatedBook {
        let mut doc_props = self.doc_props;
        if doc_props.raw_title.is_empty() {
            doc_props.raw_title = folder_title(&self.first_path);
        }
        AggregatedBook {
            checksum: self.checksum,
            doc_props,
            annotations: self.annotations,
        }
    }
}

/// Fallback title when no file in the group carried one: the parent folder
/// name, minus KoReader's `.sdr` suffix, underscores read as spaces. The one
/// place path-derived data becomes book content.
fn folder_title(path: &Path) -> String {
    let parent = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stripped = if parent.to_ascii_lowercase().ends_with(".sdr") {
        &parent[..parent.len() - 4]
    } else {
        parent
    };
    stripped.replace('_', " ").trim().to_string()
}
