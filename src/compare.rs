//! Side-by-side comparison of two result documents

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::report::text::format_score;
use crate::results::{EvaluationDocument, PrimaryScore};

/// Files modified closer together than this were probably produced together
const GENERATED_TOGETHER_SECS: i64 = 600;

/// Size and timestamps of a result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// File path
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification, if the platform reports it
    pub modified: Option<DateTime<Local>>,
}

impl FileInfo {
    /// Stat a file
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
        })
    }

    /// Size in KiB with two decimals
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size_bytes as f64 / 1024.0)
    }
}

/// One document of the comparison
#[derive(Debug, Clone, Serialize)]
pub struct Side {
    /// File details
    pub info: FileInfo,
    /// `pretrained=` model path
    pub pretrained: Option<String>,
    /// Primary score per task
    pub scores: BTreeMap<String, PrimaryScore>,
}

impl Side {
    fn load(path: &Path, catalog: &Catalog) -> Result<Self> {
        let document = EvaluationDocument::load_with_results(path)?;
        Ok(Self {
            info: FileInfo::read(path)?,
            pretrained: document.pretrained(),
            scores: document.task_scores(catalog),
        })
    }

    fn score(&self, task: &str) -> Option<f64> {
        self.scores.get(task).map(|s| s.percent)
    }
}

/// Scores of one task on both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRow {
    /// Task id
    pub task: String,
    /// Left score in percent
    pub left: Option<f64>,
    /// Right score in percent
    pub right: Option<f64>,
}

impl CompareRow {
    /// `right - left` in percentage points
    pub fn delta(&self) -> Option<f64> {
        Some(self.right? - self.left?)
    }
}

/// Result of [`compare_files`]
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// First document
    pub left: Side,
    /// Second document
    pub right: Side,
    /// One row per configured task
    pub rows: Vec<CompareRow>,
}

impl Comparison {
    /// Both files were modified within ten minutes of each other
    pub fn generated_together(&self) -> bool {
        match (self.left.info.modified, self.right.info.modified) {
            (Some(a), Some(b)) => (a - b).num_seconds().abs() < GENERATED_TOGETHER_SECS,
            _ => false,
        }
    }

    /// Text rendering
    pub fn render(&self, catalog: &Catalog, precision: usize) -> String {
        let mut out = String::new();

        for (label, side) in [("left", &self.left), ("right", &self.right)] {
            out.push_str(&format!("{:<6} {}\n", label, side.info.path.display()));
            out.push_str(&format!(
                "       model: {}\n",
                side.pretrained.as_deref().unwrap_or("-")
            ));
            out.push_str(&format!("       size: {}\n", side.info.size_label()));
            if let Some(modified) = side.info.modified {
                out.push_str(&format!(
                    "       modified: {}\n",
                    modified.format("%Y-%m-%d %H:%M:%S")
                ));
            }
        }

        out.push('\n');
        for row in &self.rows {
            let delta = match row.delta() {
                Some(d) => format!("{:+.*}", precision, d),
                None => "-".to_string(),
            };
            out.push_str(&format!(
                "{}: {} vs {} ({})\n",
                catalog.task_display_name(&row.task),
                format_score(row.left, precision),
                format_score(row.right, precision),
                delta
            ));
        }

        out
    }
}

/// Compare the primary scores of two result documents
pub fn compare_files(left: &Path, right: &Path, catalog: &Catalog) -> Result<Comparison> {
    let left = Side::load(left, catalog)?;
    let right = Side::load(right, catalog)?;

    let rows = catalog
        .tasks
        .iter()
        .map(|task| CompareRow {
            task: task.id.clone(),
            left: left.score(&task.id),
            right: right.score(&task.id),
        })
        .collect();

    Ok(Comparison { left, right, rows })
}
