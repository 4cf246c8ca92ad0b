//! Marginalia CLI - collect KoReader highlights across devices

mod commands;
mod discover;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect highlights from metadata files under one or more base folders
    Collect {
        /// Base folders to scan (one subfolder per device)
        #[arg(required = true)]
        base_dirs: Vec<String>,

        /// Write the aggregated books as JSON to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Use this device id for every file instead of deriving it from
        /// the folder layout
        #[arg(long)]
        device: Option<String>,

        /// Number of parallel parse jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Display information about one metadata file
    Inspect {
        /// Metadata file path
        input: String,

        /// Device id to record on the parsed file
        #[arg(long, default_value = "unknown")]
        device: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "marginalia_cli=debug,marginalia_core=debug"
    } else {
        "marginalia_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Collect {
            base_dirs,
            output,
            device,
            jobs,
        } => commands::collect(&base_dirs, output.as_deref(), device.as_deref(), jobs),

        Commands::Inspect {
            input,
            device,
            json,
        } => commands::inspect(&input, &device, json),
    }
}
