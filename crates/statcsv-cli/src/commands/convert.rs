//! `statcsv <input> [output] [metadata] [progress]`

use crate::config::Config;
use crate::error::Result;
use crate::location::Plan;
use crate::progress::ProgressBarCheckpoint;
use crate::Cli;
use statcsv_convert::{
    ConversionPipeline, ConversionSummary, ConvertOptions, FileCheckpoint, JsonLinesTable,
};
use tracing::info;

/// Run one conversion as described by the parsed command line
pub fn run(cli: &Cli, config: Config) -> Result<ConversionSummary> {
    let config = config.with_overrides(cli.line_terminator, cli.progress_mode);
    let plan = Plan::resolve(
        &cli.input,
        cli.output.as_deref(),
        cli.metadata.as_deref(),
        cli.progress.clone(),
        cli.auto_create_csv,
    )?;

    info!(input = %plan.input, "Reading from {}", plan.input);
    let table = JsonLinesTable::new(plan.input.open_read()?)?;

    info!(metadata = %plan.metadata, "Writing metadata to {}", plan.metadata);
    let metadata = plan.metadata.open_write()?;

    info!(output = %plan.output, "Writing to {}", plan.output);
    let data = plan.output.open_write()?;

    let mut pipeline = ConversionPipeline::new(ConvertOptions {
        line_terminator: config.line_terminator,
    });
    if let Some(ref path) = plan.progress {
        info!(mode = %config.progress_mode, "Progress file: {}", path.display());
        pipeline = pipeline.with_checkpoint(FileCheckpoint::new(path, config.progress_mode));
    }
    if cli.show_progress {
        pipeline = pipeline.with_checkpoint(ProgressBarCheckpoint::new("Converting"));
    }

    Ok(pipeline.run(table, data, metadata)?)
}
