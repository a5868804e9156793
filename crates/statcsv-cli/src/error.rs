//! Error types for the statcsv CLI
//!
//! Messages are user-facing and say what to change.

use statcsv_convert::ConvertError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Location string is empty or cannot be used in this position
    #[error("Invalid location '{0}'. Use a file path, 'stdin' for input or 'stdout' for output.")]
    InvalidLocation(String),

    /// Remote object locators are not handled by this tool
    #[error("Unsupported location '{0}'. Only local paths and stdin/stdout are supported; copy remote objects locally first.")]
    UnsupportedLocation(String),

    /// A file could not be opened or created
    #[error("Cannot open '{path}': {source}. Verify the path exists and you have the right permissions.")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Environment or flag values are invalid or conflict
    #[error("Configuration error: {0}")]
    Config(String),

    /// The conversion itself failed
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}
