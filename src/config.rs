//! Configuration structures for peft-compare

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Upper bound for report decimal places
const MAX_PRECISION: usize = 6;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where results live on disk
    pub layout: LayoutConfig,
    /// Models, methods and tasks
    pub catalog: Catalog,
    /// Report rendering options
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a file, picking the format from its extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, picking the format from its extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Toml => toml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;

        if self.layout.results_dir.as_os_str().is_empty() {
            return Err(Error::config("Results directory must be set"));
        }

        for (name, value) in [
            ("comparison_subdir", &self.layout.comparison_subdir),
            ("raw_data_subdir", &self.layout.raw_data_subdir),
            ("figures_subdir", &self.layout.figures_subdir),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("layout.{} must be non-empty", name)));
            }
        }

        if self.report.precision > MAX_PRECISION {
            return Err(Error::config(format!(
                "Report precision must be at most {}",
                MAX_PRECISION
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Filesystem layout of evaluation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Root of all result artifacts
    pub results_dir: PathBuf,
    /// Per-run result documents, relative to `results_dir`
    pub comparison_subdir: String,
    /// Backups of captured documents, relative to `results_dir`
    pub raw_data_subdir: String,
    /// Output directory for plotting tools, relative to `results_dir`
    pub figures_subdir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            comparison_subdir: "model_comparison".to_string(),
            raw_data_subdir: "raw_data".to_string(),
            figures_subdir: "figures".to_string(),
        }
    }
}

/// Report rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places in text reports
    pub precision: usize,
    /// Write `<task>_comparison.csv` files
    pub write_csv: bool,
    /// Compute relative improvement over the base model
    pub improvement: bool,
    /// Keep a timestamped copy of captured documents
    pub backup_captures: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 1,
            write_csv: true,
            improvement: true,
            backup_captures: true,
        }
    }
}
