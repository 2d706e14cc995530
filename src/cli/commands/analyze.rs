use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::{list_result_files, Aggregator, FileStatus};
use crate::cli::{
    error::CliResult, logging, progress::ProgressReporter, resolve_precision, Output, OutputMode,
};
use crate::config::Config;
use crate::layout::ResultsLayout;
use crate::report::Report;

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Directory of result documents
    #[arg(short, long, help = "Result directory (default: <results>/model_comparison)")]
    pub input: Option<PathBuf>,

    /// Do not write CSV tables
    #[arg(long)]
    pub no_csv: bool,

    /// Do not compute improvement over the base model
    #[arg(long)]
    pub no_improvement: bool,

    /// Decimal places in text tables
    #[arg(long)]
    pub precision: Option<usize>,
}

pub fn execute(cmd: AnalyzeCommand, config: Config, out: Output) -> CliResult<()> {
    info!("Analyzing evaluation results");

    let precision = resolve_precision(cmd.precision, config.report.precision)?;
    let layout = ResultsLayout::new(&config.layout);
    layout.ensure_directories().with_context(|| {
        format!(
            "Failed to create results directories under {}",
            config.layout.results_dir.display()
        )
    })?;

    let input = cmd
        .input
        .clone()
        .unwrap_or_else(|| layout.comparison_dir().to_path_buf());

    let total = list_result_files(&input)?.len() as u64;
    let progress = ProgressReporter::for_terminal("Loading results", total, out.show_progress())?;

    let aggregator = Aggregator::new(config.catalog.clone());
    let aggregation = aggregator.aggregate_with(&input, |path| {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        progress.advance(name);
    })?;
    progress.finish_and_clear();

    let report = Report::build(&aggregation, config.report.improvement && !cmd.no_improvement);

    let written = if config.report.write_csv && !cmd.no_csv {
        report
            .write_csv(&layout)
            .context("Failed to write comparison tables")?
    } else {
        Vec::new()
    };

    match out.mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&report.summary())?);
        }
        OutputMode::Text => {
            for outcome in aggregation.skipped() {
                if let FileStatus::Skipped { reason } = &outcome.status {
                    out.warning(&format!("{}: {}", outcome.path.display(), reason));
                }
            }

            println!("{}", logging::heading("Evaluation results"));
            println!("{}", report.render_text(aggregator.catalog(), precision));

            for path in &written {
                out.success(&format!("Saved {}", path.display()));
            }
            out.success(&format!(
                "Loaded {} of {} result files",
                aggregation.loaded(),
                aggregation.outcomes.len()
            ));
        }
    }

    Ok(())
}
