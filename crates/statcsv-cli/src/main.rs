//! statcsv - main entry point

use clap::Parser;
use statcsv_cli::{commands, config, Cli, Config};
use statcsv_common::logging::init_logging;
use std::process;
use tracing::{error, info};

fn main() {
    // Optional .env next to the working directory
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_config = match config::log_config(cli.verbose) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    };

    // The converter works without logging, so a failed init is not fatal
    let guard = init_logging(&log_config).ok();

    let result = Config::from_env().and_then(|config| commands::convert::run(&cli, config));

    match result {
        Ok(summary) => {
            info!(
                source = %summary.source_name,
                rows = summary.rows_written,
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "Conversion complete"
            );
        },
        Err(e) => {
            error!(error = %e, "Conversion failed");
            eprintln!("Error: {}", e);
            drop(guard);
            process::exit(1);
        },
    }
}
