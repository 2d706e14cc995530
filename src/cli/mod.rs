pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;

// Re-export command structures
pub use commands::{
    analyze::AnalyzeCommand, capture::CaptureCommand, compare::CompareCommand,
    inspect::InspectCommand,
};

// Re-export error types
pub use error::{CliError, CliResult};

/// How commands print their results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human readable tables
    Text,
    /// One JSON document on stdout
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutputMode::Text)
    }
}

/// Output settings shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub mode: OutputMode,
    /// `--quiet`: no progress bars or status lines
    pub quiet: bool,
}

impl Output {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self {
            mode: OutputMode::from_flag(json),
            quiet,
        }
    }

    pub fn show_progress(&self) -> bool {
        self.mode.is_text() && !self.quiet
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            logging::success(message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            logging::warning(message);
        }
    }
}

/// Decimal places from a flag, falling back to configuration
pub(crate) fn resolve_precision(flag: Option<usize>, configured: usize) -> CliResult<usize> {
    match flag {
        Some(p) if p > 6 => Err(CliError::InvalidArgument(format!(
            "precision must be at most 6, got {}",
            p
        ))),
        Some(p) => Ok(p),
        None => Ok(configured),
    }
}
