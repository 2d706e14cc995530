//! Error types for peft-compare

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aggregation and reporting operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML configuration error
    #[error("TOML error: {0}")]
    Toml(String),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Result document has no `results` section
    #[error("No results field in {0}")]
    MissingResults(PathBuf),

    /// Results directory is missing
    #[error("Results directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Nothing could be loaded from the results directory
    #[error("No result files could be loaded from {0}")]
    NoResults(PathBuf),

    /// Model or method could not be inferred
    #[error("Cannot determine model and method for {0}")]
    UnknownIdentity(String),

    /// Model id the catalog cannot resolve from a result file name
    #[error("Model '{0}' is not in the catalog; add a model alias for it")]
    UnknownModel(String),

    /// Refusing to overwrite an existing output
    #[error("Output already exists: {0}")]
    OutputExists(PathBuf),
}

/// Result type alias for peft-compare operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unknown identity error
    pub fn unknown_identity(what: impl Into<String>) -> Self {
        Self::UnknownIdentity(what.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Toml(err.to_string())
    }
}
