//! Summary of a single result document

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::identity::Identity;
use crate::report::text::format_score;
use crate::results::{EvaluationDocument, PrimaryScore};

/// What a result document says about its run
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    /// File path
    pub path: PathBuf,
    /// Identity from the model path, else from the file name
    pub identity: Option<Identity>,
    /// `pretrained=` model path
    pub pretrained: Option<String>,
    /// Weight precision
    pub precision: Option<String>,
    /// Batch size
    pub batch_size: Option<String>,
    /// Device
    pub device: Option<String>,
    /// Primary score per task
    pub scores: BTreeMap<String, PrimaryScore>,
    /// Harness task names the catalog does not know
    pub ignored_tasks: Vec<String>,
}

impl Inspection {
    /// Text rendering
    pub fn render(&self, catalog: &Catalog, precision: usize) -> String {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

        let mut out = format!("{}\n", self.path.display());
        out.push_str(&format!(
            "  identity:   {}\n",
            self.identity
                .as_ref()
                .map(|i| i.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ));
        out.push_str(&format!("  model:      {}\n", or_dash(&self.pretrained)));
        out.push_str(&format!("  precision:  {}\n", or_dash(&self.precision)));
        out.push_str(&format!("  batch size: {}\n", or_dash(&self.batch_size)));
        out.push_str(&format!("  device:     {}\n", or_dash(&self.device)));

        for task in &catalog.tasks {
            let score = self.scores.get(&task.id);
            out.push_str(&format!(
                "  {}: {}{}\n",
                task.display_name,
                format_score(score.map(|s| s.percent), precision),
                score.map(|s| format!(" [{}]", s.key)).unwrap_or_default()
            ));
        }

        if !self.ignored_tasks.is_empty() {
            out.push_str(&format!("  ignored tasks: {}\n", self.ignored_tasks.join(", ")));
        }

        out
    }
}

/// Inspect one result document
pub fn inspect_file(path: &Path, catalog: &Catalog) -> Result<Inspection> {
    let document = EvaluationDocument::load_with_results(path)?;
    let config = document.config.clone().unwrap_or_default();

    let identity = document
        .pretrained()
        .and_then(|p| Identity::from_model_dir(&p, catalog).ok())
        .or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| Identity::from_file_name(n, catalog).ok())
        });

    let ignored_tasks = document
        .results
        .iter()
        .flat_map(|results| results.keys())
        .filter(|name| catalog.normalize_task(name).is_none())
        .cloned()
        .collect();

    Ok(Inspection {
        path: path.to_path_buf(),
        identity,
        pretrained: config.pretrained(),
        precision: config.precision(),
        batch_size: config.batch_size_label(),
        device: config.device.clone(),
        scores: document.task_scores(catalog),
        ignored_tasks,
    })
}
