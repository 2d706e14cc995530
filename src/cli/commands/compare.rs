use clap::Args;
use std::path::PathBuf;

use crate::cli::{
    error::{CliError, CliResult},
    resolve_precision, Output, OutputMode,
};
use crate::compare::compare_files;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CompareCommand {
    /// First result document
    pub left: PathBuf,

    /// Second result document
    pub right: PathBuf,

    /// Decimal places for scores
    #[arg(long)]
    pub precision: Option<usize>,
}

pub fn execute(cmd: CompareCommand, config: Config, out: Output) -> CliResult<()> {
    for path in [&cmd.left, &cmd.right] {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.clone()));
        }
    }

    // harness scores are usually reported with two decimals
    let precision = resolve_precision(cmd.precision, config.report.precision.max(2))?;
    let comparison = compare_files(&cmd.left, &cmd.right, &config.catalog)?;

    match out.mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        OutputMode::Text => {
            print!("{}", comparison.render(&config.catalog, precision));
            if comparison.generated_together() {
                out.warning(
                    "Both files were modified within 10 minutes of each other; \
                     they may have been generated together",
                );
            }
        }
    }

    Ok(())
}
