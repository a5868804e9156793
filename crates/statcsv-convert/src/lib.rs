//! statcsv conversion library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Converts a typed table (schema plus a forward-only row stream) into CSV.
//!
//! # Overview
//!
//! - **Formatting**: typed cells to text ([`format`])
//! - **CSV output**: minimal quoting, fixed line terminator ([`csv_writer`])
//! - **Metadata**: a names row and a labels row, written to their own sink
//!   ([`metadata`])
//! - **Progress**: whole-percent checkpoints that overwrite a file
//!   ([`progress`])
//! - **Pipeline**: the single pass tying it together ([`pipeline`])
//! - **Sources**: the decoder-facing traits plus in-memory and JSON Lines
//!   tables ([`source`])
//!
//! # Example
//!
//! ```no_run
//! use statcsv_convert::{ConversionPipeline, FileCheckpoint, JsonLinesTable, ProgressMode};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! fn main() -> statcsv_convert::Result<()> {
//!     let input = File::open("visits.jsonl").expect("open input");
//!     let table = JsonLinesTable::new(BufReader::new(input))?;
//!
//!     let data = BufWriter::new(File::create("visits.csv").expect("create output"));
//!     let meta = File::create("visits.meta.csv").expect("create metadata");
//!
//!     let summary = ConversionPipeline::default()
//!         .with_checkpoint(FileCheckpoint::new("visits.progress", ProgressMode::Atomic))
//!         .run(table, data, meta)?;
//!     println!("{} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```

pub mod csv_writer;
pub mod error;
pub mod format;
pub mod metadata;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod source;

// Re-export commonly used types
pub use csv_writer::{DelimitedWriter, LineTerminator};
pub use error::{ConvertError, Operation, Result};
pub use format::{format_cell, format_cell_into};
pub use metadata::write_metadata;
pub use model::{Cell, Column, ConversionMetadata, Row};
pub use pipeline::{ConversionPipeline, ConversionSummary, ConvertOptions, Phase};
pub use progress::{
    CheckpointSink, FileCheckpoint, MemoryCheckpoint, ProgressMode, ProgressReporter,
    ProgressState,
};
pub use source::{JsonLinesTable, MemoryTable, RowSource, SchemaSource};
