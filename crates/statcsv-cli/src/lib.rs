//! statcsv CLI library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line front end for the conversion pipeline: argument parsing,
//! environment configuration, location resolution and a console progress
//! bar.

pub mod commands;
pub mod config;
pub mod error;
pub mod location;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::Parser;
use statcsv_convert::{LineTerminator, ProgressMode};
use std::path::PathBuf;

/// Convert a table dump to CSV, with column names and labels written to a
/// separate metadata file.
#[derive(Parser, Debug)]
#[command(name = "statcsv")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Input table dump (JSON Lines), or 'stdin'
    pub input: String,

    /// Output CSV file, or 'stdout' (default: stdout)
    pub output: Option<String>,

    /// Metadata CSV file with a names row and a labels row
    /// (default: <output>.meta.csv, or <input>.meta.csv)
    pub metadata: Option<String>,

    /// Progress file, overwritten with the current percentage
    pub progress: Option<PathBuf>,

    /// Name the output after the input (e.g. visits.jsonl -> visits.csv)
    /// instead of writing to stdout
    #[arg(short, long)]
    pub auto_create_csv: bool,

    /// Record terminator: crlf or lf [env: STATCSV_LINE_TERMINATOR]
    #[arg(long)]
    pub line_terminator: Option<LineTerminator>,

    /// How the progress file is replaced: truncate or atomic
    /// [env: STATCSV_PROGRESS_MODE]
    #[arg(long)]
    pub progress_mode: Option<ProgressMode>,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub show_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
