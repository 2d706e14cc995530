use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::capture::{capture, CaptureRequest};
use crate::catalog::Method;
use crate::cli::{
    error::{CliError, CliResult},
    Output, OutputMode,
};
use crate::config::Config;
use crate::layout::ResultsLayout;

#[derive(Args, Debug)]
pub struct CaptureCommand {
    /// Result JSON written by the evaluation harness
    #[arg(help = "Harness result file to store")]
    pub source: PathBuf,

    /// Model id, inferred from the model path when omitted
    #[arg(long)]
    pub model: Option<String>,

    /// Fine-tuning method, inferred from the model path when omitted
    #[arg(long, value_enum)]
    pub method: Option<Method>,

    /// The evaluated model had its adapter merged
    #[arg(long)]
    pub merged: bool,

    /// Overwrite an existing result file
    #[arg(short, long)]
    pub force: bool,

    /// Skip the timestamped backup copy
    #[arg(long)]
    pub no_backup: bool,
}

pub fn execute(cmd: CaptureCommand, config: Config, out: Output) -> CliResult<()> {
    if !cmd.source.exists() {
        return Err(CliError::FileNotFound(cmd.source));
    }

    let request = CaptureRequest {
        source: cmd.source,
        model: cmd.model,
        method: cmd.method,
        merged: cmd.merged.then_some(true),
        force: cmd.force,
        backup: config.report.backup_captures && !cmd.no_backup,
    };

    let layout = ResultsLayout::new(&config.layout);
    let outcome = capture(&request, &layout, &config.catalog)?;

    match out.mode {
        OutputMode::Json => {
            let value = json!({
                "identity": outcome.identity,
                "destination": outcome.destination,
                "backup": outcome.backup,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputMode::Text => {
            out.success(&format!(
                "Saved {} results to {}",
                outcome.identity,
                outcome.destination.display()
            ));
            if let Some(backup) = &outcome.backup {
                out.success(&format!("Backup saved to {}", backup.display()));
            }
        }
    }

    Ok(())
}
