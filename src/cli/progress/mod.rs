use anyhow::Context;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, IsTerminal};

use crate::cli::error::CliResult;

pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter with a known total
    pub fn new_with_total(message: &str, total: u64) -> CliResult<Self> {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .context("Invalid progress bar template")?
                .progress_chars("█▇▆▅▄▃▂▁  "),
        );
        bar.set_message(message.to_string());

        Ok(Self { bar })
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Bar on interactive terminals, hidden otherwise or when disabled
    pub fn for_terminal(message: &str, total: u64, enabled: bool) -> CliResult<Self> {
        if !enabled || !io::stderr().is_terminal() {
            return Ok(Self::hidden());
        }

        let reporter = Self::new_with_total(message, total)?;
        reporter.bar.set_draw_target(ProgressDrawTarget::stderr());
        Ok(reporter)
    }

    /// Advance progress by 1 and optionally update message
    pub fn advance(&self, message: &str) {
        if !message.is_empty() {
            self.bar.set_message(message.to_string());
        }
        self.bar.inc(1);
    }

    /// Finish the progress bar and clear it
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
