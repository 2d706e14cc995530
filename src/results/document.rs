//! Result document as written by the evaluation harness

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::metrics::{PrimaryScore, TaskMetrics};
use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// One evaluation run: per-task metrics plus the run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDocument {
    /// Task name to metrics; absent in some broken captures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<String, TaskMetrics>>,
    /// Harness configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RunConfig>,
    /// Task versions
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub versions: Map<String, Value>,
    /// Everything else the harness wrote
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationDocument {
    /// Read and parse a document
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a document from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(content)?;
        Ok(document)
    }

    /// Read a document that must contain a `results` section
    pub fn load_with_results(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = Self::from_path(path)?;
        if document.results.is_none() {
            return Err(Error::MissingResults(PathBuf::from(path)));
        }
        Ok(document)
    }

    /// Write the document as pretty JSON
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Primary score per configured task, keyed by normalized task id.
    ///
    /// Tasks the catalog does not know are ignored. A harness task named
    /// exactly like a configured task always wins; otherwise, when several
    /// subtasks normalize to the same id, the last one in name order wins.
    pub fn task_scores(&self, catalog: &Catalog) -> BTreeMap<String, PrimaryScore> {
        let mut scores = BTreeMap::new();

        let Some(results) = &self.results else {
            return scores;
        };

        let mut exact: BTreeSet<&str> = BTreeSet::new();
        for (name, metrics) in results {
            let Some(task) = catalog.normalize_task(name) else {
                continue;
            };
            let is_exact = task.id == *name;
            if !is_exact && exact.contains(task.id.as_str()) {
                continue;
            }
            if let Some(score) = metrics.primary_score(&catalog.metric_preference) {
                if is_exact {
                    exact.insert(task.id.as_str());
                }
                scores.insert(task.id.clone(), score);
            }
        }

        scores
    }

    /// `pretrained=` path from the run configuration
    pub fn pretrained(&self) -> Option<String> {
        self.config.as_ref().and_then(RunConfig::pretrained)
    }
}

/// Harness run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Model backend, usually `hf`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `key=value,...` string or a map, depending on harness version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_args: Option<Value>,
    /// Integer or `"auto"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<Value>,
    /// Accelerator used for the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Remaining harness settings
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunConfig {
    /// Look up one entry of `model_args`
    pub fn model_arg(&self, key: &str) -> Option<String> {
        match self.model_args.as_ref()? {
            Value::String(args) => args.split(',').find_map(|pair| {
                let (k, v) = pair.split_once('=')?;
                (k.trim() == key).then(|| v.trim().to_string())
            }),
            Value::Object(map) => map.get(key).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }

    /// Path or hub name of the evaluated model
    pub fn pretrained(&self) -> Option<String> {
        self.model_arg("pretrained")
    }

    /// Weight precision such as `float16`
    pub fn precision(&self) -> Option<String> {
        self.model_arg("dtype")
    }

    /// Batch size as text
    pub fn batch_size_label(&self) -> Option<String> {
        self.batch_size.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
