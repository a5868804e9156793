//! Conversion settings
//!
//! Precedence, lowest first: built-in defaults, `STATCSV_*` environment
//! variables (a `.env` file is loaded by `main`), command-line flags.

use crate::error::{CliError, Result};
use statcsv_common::logging::{LogConfig, LogLevel};
use statcsv_convert::{LineTerminator, ProgressMode};

/// Environment variable selecting the record terminator
pub const ENV_LINE_TERMINATOR: &str = "STATCSV_LINE_TERMINATOR";

/// Environment variable selecting how the progress file is replaced
pub const ENV_PROGRESS_MODE: &str = "STATCSV_PROGRESS_MODE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub line_terminator: LineTerminator,
    pub progress_mode: ProgressMode,
}

impl Config {
    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_LINE_TERMINATOR) {
            config.line_terminator = value
                .parse()
                .map_err(|e| CliError::config(format!("{}: {}", ENV_LINE_TERMINATOR, e)))?;
        }

        if let Ok(value) = std::env::var(ENV_PROGRESS_MODE) {
            config.progress_mode = value
                .parse()
                .map_err(|e| CliError::config(format!("{}: {}", ENV_PROGRESS_MODE, e)))?;
        }

        Ok(config)
    }

    /// Apply flag values; `None` keeps the current setting
    pub fn with_overrides(
        mut self,
        line_terminator: Option<LineTerminator>,
        progress_mode: Option<ProgressMode>,
    ) -> Self {
        if let Some(terminator) = line_terminator {
            self.line_terminator = terminator;
        }
        if let Some(mode) = progress_mode {
            self.progress_mode = mode;
        }
        self
    }
}

/// Logging settings with the same precedence: `LOG_*` variables, then `-v`
pub fn log_config(verbose: bool) -> Result<LogConfig> {
    let mut config = LogConfig::builder()
        .log_file_prefix("statcsv")
        .build()
        .merge_env()
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    if verbose {
        config.level = LogLevel::Debug;
    }
    Ok(config)
}
