//! Collect command implementation

use crate::discover::find_metadata_files;
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use marginalia_core::collector::aggregate_outcomes;
use marginalia_core::{parse_metadata_file, AggregatedBook};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// JSON digest written by `--output`.
#[derive(Serialize)]
struct ExportDigest<'a> {
    generated_at: chrono::DateTime<Utc>,
    total_books: usize,
    total_highlights: usize,
    books: Vec<&'a AggregatedBook>,
}

/// Collect highlights from every metadata file under the base folders
pub fn collect(
    base_dirs: &[String],
    output: Option<&str>,
    device_label: Option<&str>,
    jobs: usize,
) -> Result<()> {
    let mut entries = Vec::new();
    for base in base_dirs {
        entries.extend(find_metadata_files(Path::new(base), device_label)?);
    }

    if entries.is_empty() {
        println!("No metadata files found under {}", base_dirs.join(", "));
        return Ok(());
    }

    println!("Found {} metadata files", entries.len());

    // Configure thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    // Parse in parallel (each file is independent), merge sequentially below
    let outcomes: Vec<_> = entries
        .par_iter()
        .map(|entry| {
            let outcome = parse_metadata_file(&entry.path, &entry.device_id);
            pb.inc(1);
            (entry.path.clone(), outcome)
        })
        .collect();
    pb.finish();

    let report = aggregate_outcomes(outcomes);

    let total_highlights: usize = report.books.iter().map(AggregatedBook::annotation_count).sum();
    println!("\nScan complete:");
    println!("  Files parsed:  {}", report.files_processed);
    println!("  Files failed:  {}", report.files_failed());
    println!("  Books:         {}", report.books.len());
    println!("  Annotations:   {}", total_highlights);
    if report.unclassified_annotations > 0 {
        println!("  Unclassified:  {}", report.unclassified_annotations);
    }
    for failure in &report.failures {
        println!("  failed {}: {}", failure.path.display(), failure.error);
    }

    if let Some(output) = output {
        // presentation order only; the report itself stays first-seen order
        let mut books: Vec<&AggregatedBook> = report.books.iter().collect();
        books.sort_by_key(|b| b.title().to_lowercase());

        let digest = ExportDigest {
            generated_at: Utc::now(),
            total_books: books.len(),
            total_highlights,
            books,
        };
        let json = serde_json::to_string_pretty(&digest)?;
        fs::write(output, json).with_context(|| format!("Failed to write {}", output))?;
        println!("Wrote {}", output);
    }

    Ok(())
}
