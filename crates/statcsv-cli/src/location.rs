//! Input and output locations
//!
//! A location is a local path or one of the standard stream keywords:
//! `stdin` as an input, `stdout` as an output. Anything that looks like a
//! remote object locator (`gs://bucket/key`, `s3://...`) is rejected.

use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Read buffer for input files and stdin
const INPUT_BUFFER: usize = 1 << 20;

/// Write buffer for output files and stdout
const OUTPUT_BUFFER: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// stdin for inputs, stdout for outputs
    Stdio,
    Path(PathBuf),
}

impl Location {
    /// Parse an input location; `stdin` selects standard input
    pub fn input(text: &str) -> Result<Self> {
        Self::parse(text, "stdin")
    }

    /// Parse an output location; `stdout` selects standard output
    pub fn output(text: &str) -> Result<Self> {
        Self::parse(text, "stdout")
    }

    fn parse(text: &str, keyword: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(CliError::InvalidLocation(text.to_string()));
        }
        if text == keyword {
            return Ok(Location::Stdio);
        }
        if text.contains("://") {
            return Err(CliError::UnsupportedLocation(text.to_string()));
        }
        Ok(Location::Path(PathBuf::from(text)))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Location::Path(path) => Some(path),
            Location::Stdio => None,
        }
    }

    /// Open for reading, buffered
    pub fn open_read(&self) -> Result<Box<dyn BufRead>> {
        match self {
            Location::Stdio => Ok(Box::new(BufReader::with_capacity(
                INPUT_BUFFER,
                io::stdin().lock(),
            ))),
            Location::Path(path) => {
                let file = File::open(path).map_err(|e| CliError::open(path.display().to_string(), e))?;
                Ok(Box::new(BufReader::with_capacity(INPUT_BUFFER, file)))
            },
        }
    }

    /// Create (or truncate) for writing, buffered
    pub fn open_write(&self) -> Result<Box<dyn Write>> {
        match self {
            Location::Stdio => Ok(Box::new(BufWriter::with_capacity(
                OUTPUT_BUFFER,
                io::stdout().lock(),
            ))),
            Location::Path(path) => {
                let file =
                    File::create(path).map_err(|e| CliError::open(path.display().to_string(), e))?;
                Ok(Box::new(BufWriter::with_capacity(OUTPUT_BUFFER, file)))
            },
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Stdio => f.write_str("standard stream"),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// `data.jsonl` -> `data.csv`, next to the input
pub fn derived_csv_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

/// `data.csv` -> `data.meta.csv`
pub fn derived_metadata_path(base: &Path) -> PathBuf {
    base.with_extension("meta.csv")
}

/// Resolved locations for one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub input: Location,
    pub output: Location,
    pub metadata: Location,
    pub progress: Option<PathBuf>,
}

impl Plan {
    /// Resolve the positional arguments.
    ///
    /// - no output: `stdout`, or `<input>.csv` when `auto_create` is set
    /// - no metadata: `<output>.meta.csv`, else `<input>.meta.csv`
    pub fn resolve(
        input: &str,
        output: Option<&str>,
        metadata: Option<&str>,
        progress: Option<PathBuf>,
        auto_create: bool,
    ) -> Result<Self> {
        let input = Location::input(input)?;

        let output = match (output, auto_create) {
            (Some(text), _) => Location::output(text)?,
            (None, true) => match input.path() {
                Some(path) => Location::Path(derived_csv_path(path)),
                None => {
                    return Err(CliError::config(
                        "--auto-create-csv needs an input file to name the output after",
                    ))
                },
            },
            (None, false) => Location::Stdio,
        };

        let metadata = match metadata {
            Some(text) => Location::output(text)?,
            None => match output.path().or(input.path()) {
                Some(base) => Location::Path(derived_metadata_path(base)),
                None => {
                    return Err(CliError::config(
                        "a metadata location is required when reading stdin and writing stdout",
                    ))
                },
            },
        };

        if output == Location::Stdio && metadata == Location::Stdio {
            return Err(CliError::config(
                "data and metadata cannot both be written to stdout",
            ));
        }
        if let (Some(out), Some(meta)) = (output.path(), metadata.path()) {
            if out == meta {
                return Err(CliError::config(format!(
                    "data and metadata would both be written to {}",
                    out.display()
                )));
            }
        }

        if let Some(source) = input.path() {
            let targets = [output.path(), metadata.path(), progress.as_deref()];
            if targets.into_iter().flatten().any(|target| target == source) {
                return Err(CliError::config(format!(
                    "{} is the input and cannot also be written to",
                    source.display()
                )));
            }
        }

        Ok(Self {
            input,
            output,
            metadata,
            progress,
        })
    }
}
