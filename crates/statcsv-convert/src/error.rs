//! Error types for the conversion pipeline

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// The I/O step that was running when a stream failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadSchema,
    ReadRow,
    WriteMetadata,
    WriteHeader,
    WriteRow,
    FlushData,
    WriteCheckpoint,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::ReadSchema => "reading schema",
            Operation::ReadRow => "reading row",
            Operation::WriteMetadata => "writing metadata",
            Operation::WriteHeader => "writing header",
            Operation::WriteRow => "writing row",
            Operation::FlushData => "flushing data",
            Operation::WriteCheckpoint => "writing progress checkpoint",
        };
        f.write_str(name)
    }
}

/// Fatal conversion errors.
///
/// There is no recoverable variant: every error halts the conversion in the
/// phase where it occurred.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A row does not have one cell per column
    #[error("Row {row} has {actual} cells but the schema has {expected} columns")]
    SchemaViolation {
        row: u64,
        expected: usize,
        actual: usize,
    },

    /// The source produced a value that has no cell representation
    #[error("Unsupported cell kind in row {row}, column {column}: {kind}")]
    UnsupportedCellKind {
        row: u64,
        column: usize,
        kind: String,
    },

    /// A read, write or flush failed on one of the streams
    #[error("I/O failure while {operation}: {source}")]
    Io {
        operation: Operation,
        #[source]
        source: std::io::Error,
    },

    /// The source's schema preamble is missing or malformed
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl ConvertError {
    pub fn io(operation: Operation, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    /// The I/O operation that failed, if this is an I/O error
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Io { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
