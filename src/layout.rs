//! Paths of result artifacts

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::identity::Identity;

/// Resolved result directory layout
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsLayout {
    root: PathBuf,
    comparison_dir: PathBuf,
    raw_data_dir: PathBuf,
    figures_dir: PathBuf,
}

impl ResultsLayout {
    /// Build the layout from configuration
    pub fn new(config: &LayoutConfig) -> Self {
        let root = config.results_dir.clone();
        Self {
            comparison_dir: root.join(&config.comparison_subdir),
            raw_data_dir: root.join(&config.raw_data_subdir),
            figures_dir: root.join(&config.figures_subdir),
            root,
        }
    }

    /// Default layout rooted somewhere else
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let config = LayoutConfig {
            results_dir: root.into(),
            ..LayoutConfig::default()
        };
        Self::new(&config)
    }

    /// Directory holding one result document per model/method
    pub fn comparison_dir(&self) -> &Path {
        &self.comparison_dir
    }

    /// Directory holding backups
    pub fn raw_data_dir(&self) -> &Path {
        &self.raw_data_dir
    }

    /// Directory for figures produced by plotting tools
    pub fn figures_dir(&self) -> &Path {
        &self.figures_dir
    }

    /// Path of the result document for an identity
    pub fn result_file(&self, identity: &Identity) -> PathBuf {
        self.comparison_dir.join(identity.file_name())
    }

    /// `<root>/<task>_comparison.csv`
    pub fn comparison_csv(&self, task: &str) -> PathBuf {
        self.root.join(format!("{}_comparison.csv", task))
    }

    /// `<root>/<task>_improvement.csv`
    pub fn improvement_csv(&self, task: &str) -> PathBuf {
        self.root.join(format!("{}_improvement.csv", task))
    }

    /// Create every directory of the layout
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.root,
            &self.figures_dir,
            &self.raw_data_dir,
            &self.comparison_dir,
        ] {
            std::fs::create_dir_all(dir)?;
            debug!("Ensured directory exists: {}", dir.display());
        }
        Ok(())
    }
}
