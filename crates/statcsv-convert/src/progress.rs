//! Progress checkpoints
//!
//! Progress is published as a whole percentage. Each checkpoint replaces the
//! previous one instead of appending, so a reader only ever sees the latest
//! value. The value `100` is reserved for the end of the conversion and is
//! always the last thing published.

use crate::error::{ConvertError, Operation, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};

/// Percentage published when the conversion completes
pub const COMPLETE: i64 = 100;

/// Destination for progress checkpoints.
///
/// `publish` must replace whatever the sink held before.
pub trait CheckpointSink {
    fn publish(&mut self, percent: i64) -> io::Result<()>;
}

/// How a [`FileCheckpoint`] replaces the file contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Truncate and rewrite the file in place
    #[default]
    Truncate,
    /// Write a sibling temp file and rename it over the target
    Atomic,
}

impl std::str::FromStr for ProgressMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truncate" | "overwrite" => Ok(ProgressMode::Truncate),
            "atomic" | "rename" => Ok(ProgressMode::Atomic),
            _ => Err(format!("Invalid progress mode: {} (expected truncate or atomic)", s)),
        }
    }
}

impl std::fmt::Display for ProgressMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressMode::Truncate => f.write_str("truncate"),
            ProgressMode::Atomic => f.write_str("atomic"),
        }
    }
}

/// Progress file holding a single integer
#[derive(Debug, Clone)]
pub struct FileCheckpoint {
    path: PathBuf,
    mode: ProgressMode,
}

impl FileCheckpoint {
    pub fn new(path: impl Into<PathBuf>, mode: ProgressMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn publish_atomic(&self, text: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CheckpointSink for FileCheckpoint {
    fn publish(&mut self, percent: i64) -> io::Result<()> {
        let text = percent.to_string();
        match self.mode {
            ProgressMode::Truncate => std::fs::write(&self.path, text),
            ProgressMode::Atomic => self.publish_atomic(&text),
        }
    }
}

/// Records every published value in memory.
///
/// Clones share the same log, so a clone can be handed to the pipeline and
/// inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpoint {
    published: Rc<RefCell<Vec<i64>>>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value published so far, oldest first
    pub fn published(&self) -> Vec<i64> {
        self.published.borrow().clone()
    }

    /// Current content of the sink
    pub fn current(&self) -> Option<i64> {
        self.published.borrow().last().copied()
    }
}

impl CheckpointSink for MemoryCheckpoint {
    fn publish(&mut self, percent: i64) -> io::Result<()> {
        self.published.borrow_mut().push(percent);
        Ok(())
    }
}

/// Row counter owned by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub rows_processed: i64,
    pub last_emitted_percent: i64,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            rows_processed: 0,
            last_emitted_percent: -1,
        }
    }
}

/// Turns processed-row counts into checkpoints.
pub struct ProgressReporter {
    sinks: Vec<Box<dyn CheckpointSink>>,
    total_row_count: i64,
    state: ProgressState,
}

impl ProgressReporter {
    pub fn new(total_row_count: i64, sinks: Vec<Box<dyn CheckpointSink>>) -> Self {
        if !sinks.is_empty() && total_row_count <= 0 {
            warn!(
                total_row_count,
                "Source reports no rows; skipping intermediate progress checkpoints"
            );
        }
        Self {
            sinks,
            total_row_count,
            state: ProgressState::default(),
        }
    }

    /// A reporter with no sinks; every call is a no-op
    pub fn disabled() -> Self {
        Self::new(0, Vec::new())
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Record one more processed row and publish if the percentage moved.
    pub fn advance(&mut self) -> Result<()> {
        if self.sinks.is_empty() {
            return Ok(());
        }
        self.state.rows_processed += 1;

        let Some(percent) = percent_of(self.state.rows_processed, self.total_row_count) else {
            return Ok(());
        };
        if percent >= COMPLETE || percent == self.state.last_emitted_percent {
            return Ok(());
        }

        self.emit(percent)?;
        self.state.last_emitted_percent = percent;
        Ok(())
    }

    /// Publish the terminal `100`, whatever the row count reached.
    pub fn finish(&mut self) -> Result<()> {
        if self.sinks.is_empty() {
            return Ok(());
        }
        self.emit(COMPLETE)?;
        self.state.last_emitted_percent = COMPLETE;
        Ok(())
    }

    fn emit(&mut self, percent: i64) -> Result<()> {
        info!("Progress: {}", percent);
        for sink in &mut self.sinks {
            sink.publish(percent)
                .map_err(|e| ConvertError::io(Operation::WriteCheckpoint, e))?;
        }
        Ok(())
    }
}

/// `floor(rows * 100 / total)` clamped to `0..=100`; `None` when `total <= 0`.
pub fn percent_of(rows: i64, total: i64) -> Option<i64> {
    if total <= 0 {
        return None;
    }
    let percent = i128::from(rows.max(0)) * 100 / i128::from(total);
    Some(percent.min(i128::from(COMPLETE)) as i64)
}
