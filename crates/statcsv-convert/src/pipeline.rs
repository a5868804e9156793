//! Conversion pipeline
//!
//! One conversion is a single forward pass:
//!
//! ```text
//! Start -> Metadata -> Header -> Rows (loop) -> Flush -> Done
//! ```
//!
//! Any failure stops the pass in the phase where it happened and is returned
//! to the caller. Sinks written so far are left as they are; output is not
//! atomic.

use crate::csv_writer::{DelimitedWriter, LineTerminator};
use crate::error::{ConvertError, Operation, Result};
use crate::format::format_cell_into;
use crate::metadata::write_metadata;
use crate::progress::{CheckpointSink, ProgressReporter};
use crate::source::{RowSource, SchemaSource};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};

/// Conversion phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Metadata,
    Header,
    Rows,
    Flush,
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::Metadata => "metadata",
            Phase::Header => "header",
            Phase::Rows => "rows",
            Phase::Flush => "flush",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Output settings shared by the data and metadata files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub line_terminator: LineTerminator,
}

/// Outcome of a completed conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub source_name: String,
    pub rows_written: u64,
    pub elapsed: Duration,
}

/// Single-pass table to CSV converter.
///
/// # Example
///
/// ```
/// use statcsv_convert::{Cell, Column, ConversionPipeline, MemoryCheckpoint, MemoryTable};
///
/// let table = MemoryTable::new(
///     "demo",
///     vec![Column::new("id", "ID"), Column::unlabeled("val")],
///     vec![vec![Cell::from(1_i64), Cell::from("a,b")]],
/// );
/// let progress = MemoryCheckpoint::new();
/// let (mut data, mut meta) = (Vec::new(), Vec::new());
///
/// let summary = ConversionPipeline::default()
///     .with_checkpoint(progress.clone())
///     .run(table, &mut data, &mut meta)
///     .unwrap();
///
/// assert_eq!(summary.rows_written, 1);
/// assert_eq!(data, b"id,val\r\n1,\"a,b\"\r\n");
/// assert_eq!(meta, b"id,val\r\nID,\r\n");
/// assert_eq!(progress.current(), Some(100));
/// ```
#[derive(Default)]
pub struct ConversionPipeline {
    options: ConvertOptions,
    checkpoints: Vec<Box<dyn CheckpointSink>>,
}

impl ConversionPipeline {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            checkpoints: Vec::new(),
        }
    }

    /// Publish progress to `sink` as well. Without any checkpoint sink,
    /// progress tracking is skipped entirely.
    pub fn with_checkpoint(mut self, sink: impl CheckpointSink + 'static) -> Self {
        self.checkpoints.push(Box::new(sink));
        self
    }

    /// Convert every row of `source`, writing CSV to `data` and the two
    /// metadata rows to `metadata`.
    ///
    /// `metadata` is flushed and dropped once the metadata phase ends; `data`
    /// is flushed and dropped at the end of the pass.
    pub fn run<S, W, M>(self, mut source: S, data: W, metadata: M) -> Result<ConversionSummary>
    where
        S: SchemaSource + RowSource,
        W: Write,
        M: Write,
    {
        let started = Instant::now();
        let span = info_span!("convert", source = %source.metadata().source_name);
        let _enter = span.enter();

        let mut phase = Phase::Start;
        let result = self.run_phases(&mut source, data, metadata, &mut phase);

        match result {
            Ok(rows_written) => {
                let elapsed = started.elapsed();
                info!("Converting took {} seconds.", elapsed.as_secs());
                Ok(ConversionSummary {
                    source_name: source.metadata().source_name.clone(),
                    rows_written,
                    elapsed,
                })
            },
            Err(e) => {
                warn!(phase = %phase, error = %e, "Conversion halted");
                Err(e)
            },
        }
    }

    fn run_phases<S, W, M>(
        self,
        source: &mut S,
        data: W,
        metadata: M,
        phase: &mut Phase,
    ) -> Result<u64>
    where
        S: SchemaSource + RowSource,
        W: Write,
        M: Write,
    {
        let terminator = self.options.line_terminator;
        let total_row_count = source.metadata().total_row_count;
        let columns = source.columns().to_vec();

        info!("Reading file {}", source.metadata().source_name);
        info!("{} rows.", total_row_count);
        debug!(columns = columns.len(), "Schema loaded");

        enter(phase, Phase::Metadata);
        write_metadata(&columns, metadata, terminator)?;
        info!("Done writing metadata.");

        enter(phase, Phase::Header);
        let mut writer = DelimitedWriter::new(data, terminator);
        writer
            .write_record(columns.iter().map(|c| c.name.as_str()))
            .map_err(|e| ConvertError::io(Operation::WriteHeader, e))?;

        enter(phase, Phase::Rows);
        info!("Writing data...");
        let mut progress = ProgressReporter::new(total_row_count, self.checkpoints);
        let mut fields = vec![String::new(); columns.len()];
        let mut rows_written: u64 = 0;

        while let Some(row) = source.next_row()? {
            if row.len() != columns.len() {
                return Err(ConvertError::SchemaViolation {
                    row: rows_written + 1,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }

            for (field, cell) in fields.iter_mut().zip(&row) {
                field.clear();
                format_cell_into(cell, field);
            }
            writer
                .write_record(&fields)
                .map_err(|e| ConvertError::io(Operation::WriteRow, e))?;

            rows_written += 1;
            progress.advance()?;
        }
        info!("Done writing data.");
        info!("{} rows written.", rows_written);

        enter(phase, Phase::Flush);
        let sink = writer
            .finish()
            .map_err(|e| ConvertError::io(Operation::FlushData, e))?;
        drop(sink);
        progress.finish()?;

        enter(phase, Phase::Done);
        Ok(rows_written)
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!(from = %phase, to = %next, "Phase transition");
    *phase = next;
}
