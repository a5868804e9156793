//! statcsv common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Ambient plumbing shared by the statcsv workspace members.
//!
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]

pub mod logging;

pub use logging::{init_logging, LogConfig, LoggingGuard};
