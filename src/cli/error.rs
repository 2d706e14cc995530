use colored::*;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::Error as CoreError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Print a user-friendly error message
    pub fn print_error(&self) {
        match self {
            // include the context chain
            CliError::Other(err) => eprintln!("{} {:#}", "Error:".red().bold(), err),
            _ => eprintln!("{} {}", "Error:".red().bold(), self),
        }

        // Add helpful suggestions based on error type
        match self {
            CliError::ConfigNotFound(_) => {
                eprintln!(
                    "\n{} Run {} to create a default configuration file",
                    "Hint:".yellow(),
                    "peft-compare config init".cyan()
                );
            }
            CliError::FileNotFound(path) => {
                eprintln!(
                    "\n{} Make sure the file exists and the path is correct: {}",
                    "Hint:".yellow(),
                    path.display().to_string().cyan()
                );
            }
            CliError::InvalidArgument(_) => {
                eprintln!(
                    "\n{} Use {} for more information",
                    "Hint:".yellow(),
                    "peft-compare --help".cyan()
                );
            }
            CliError::Core(CoreError::NoResults(_)) | CliError::Core(CoreError::DirectoryNotFound(_)) => {
                eprintln!(
                    "\n{} Run the evaluation first, then store its output with {}",
                    "Hint:".yellow(),
                    "peft-compare capture <results.json>".cyan()
                );
            }
            CliError::Core(CoreError::OutputExists(_)) => {
                eprintln!("\n{} Pass {} to overwrite", "Hint:".yellow(), "--force".cyan());
            }
            CliError::Core(CoreError::UnknownIdentity(_)) => {
                eprintln!(
                    "\n{} Name the run explicitly with {} and {}",
                    "Hint:".yellow(),
                    "--model".cyan(),
                    "--method".cyan()
                );
            }
            CliError::Core(CoreError::UnknownModel(_)) => {
                eprintln!(
                    "\n{} Add a {} entry to the configuration (see {})",
                    "Hint:".yellow(),
                    "catalog.models".cyan(),
                    "peft-compare config show".cyan()
                );
            }
            _ => {}
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}
