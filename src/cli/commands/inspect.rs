use clap::Args;
use std::path::PathBuf;

use crate::cli::{
    error::{CliError, CliResult},
    resolve_precision, Output, OutputMode,
};
use crate::config::Config;
use crate::inspect::inspect_file;

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Result document to describe
    pub file: PathBuf,

    /// Decimal places for scores
    #[arg(long)]
    pub precision: Option<usize>,
}

pub fn execute(cmd: InspectCommand, config: Config, out: Output) -> CliResult<()> {
    if !cmd.file.exists() {
        return Err(CliError::FileNotFound(cmd.file));
    }

    let precision = resolve_precision(cmd.precision, config.report.precision)?;
    let inspection = inspect_file(&cmd.file, &config.catalog)?;

    match out.mode {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&inspection)?),
        OutputMode::Text => print!("{}", inspection.render(&config.catalog, precision)),
    }

    Ok(())
}
