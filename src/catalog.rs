//! Known models, fine-tuning methods and benchmark tasks
//!
//! The catalog is the vocabulary used to turn loosely named result files into
//! table coordinates. Everything here is configurable through [`crate::Config`];
//! the defaults describe the models and tasks compared by the training runs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Fine-tuning method of a result
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Untuned base model
    Base,
    /// Full fine-tuning
    Full,
    /// LoRA adapter
    Lora,
    /// LoRA on a quantized base model
    Qlora,
}

impl Method {
    /// All methods in report order, `base` first
    pub const ALL: [Method; 4] = [Method::Base, Method::Full, Method::Lora, Method::Qlora];

    /// Token used in file and directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Base => "base",
            Method::Full => "full",
            Method::Lora => "lora",
            Method::Qlora => "qlora",
        }
    }

    /// Label used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Method::Base => "Base model",
            Method::Full => "Full fine-tuning",
            Method::Lora => "LoRA",
            Method::Qlora => "QLoRA",
        }
    }

    /// Whether the method changes the model weights
    pub fn is_tuned(&self) -> bool {
        !matches!(self, Method::Base)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_input(format!("unknown method '{}'", s)))
    }
}

/// Maps a filename token onto a canonical model id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAlias {
    /// Substring looked for in lowercased names
    pub token: String,
    /// Canonical model id used as table row
    pub model: String,
}

impl ModelAlias {
    /// Create an alias
    pub fn new(token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            model: model.into(),
        }
    }
}

/// A benchmark task that gets its own comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task name as written by the evaluation harness
    pub id: String,
    /// Human readable name
    pub display_name: String,
}

impl TaskSpec {
    /// Create a task
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Models, tasks and metric preferences used during aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Filename tokens and the model they denote
    pub models: Vec<ModelAlias>,
    /// Preferred row order for reports
    pub model_order: Vec<String>,
    /// Tasks with a comparison table
    pub tasks: Vec<TaskSpec>,
    /// Metric names tried in order when picking a task's primary score
    pub metric_preference: Vec<String>,
    /// Row used when no model could be discovered
    pub fallback_model: String,
    /// Column used when no method could be discovered
    pub fallback_method: Method,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            models: vec![
                ModelAlias::new("tinyllama", "tinyllama"),
                ModelAlias::new("phi", "phi2"),
                ModelAlias::new("phi2", "phi2"),
                ModelAlias::new("gemma", "gemma2b"),
                ModelAlias::new("mistral", "mistral"),
            ],
            model_order: vec![
                "tinyllama".to_string(),
                "phi2".to_string(),
                "gemma2b".to_string(),
                "mistral".to_string(),
            ],
            tasks: vec![
                TaskSpec::new("hellaswag", "HellaSwag (commonsense reasoning)"),
                TaskSpec::new("gsm8k", "GSM8K (math reasoning)"),
                TaskSpec::new(
                    "mmlu_high_school_computer_science",
                    "MMLU-CS (computer science knowledge)",
                ),
            ],
            metric_preference: vec![
                "acc".to_string(),
                "exact_match".to_string(),
                "f1".to_string(),
            ],
            fallback_model: "tinyllama".to_string(),
            fallback_method: Method::Lora,
        }
    }
}

impl Catalog {
    /// Validate the catalog
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(Error::config("At least one task must be configured"));
        }

        if self.metric_preference.is_empty() {
            return Err(Error::config("Metric preference list must not be empty"));
        }

        let mut tokens = HashSet::new();
        for alias in &self.models {
            if alias.token.trim().is_empty() || alias.model.trim().is_empty() {
                return Err(Error::config("Model alias token and model must be non-empty"));
            }
            if !tokens.insert(alias.token.to_lowercase()) {
                return Err(Error::config(format!(
                    "Duplicate model alias token '{}'",
                    alias.token
                )));
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(Error::config(format!("Duplicate task '{}'", task.id)));
            }
        }

        if self.fallback_model.trim().is_empty() {
            return Err(Error::config("Fallback model must be non-empty"));
        }

        Ok(())
    }

    /// Look up a configured task by id
    pub fn task(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Map a harness task name onto a configured task.
    ///
    /// Any `mmlu_*` subtask collapses onto the configured MMLU task, since only
    /// one MMLU subject is compared.
    pub fn normalize_task(&self, name: &str) -> Option<&TaskSpec> {
        if let Some(task) = self.task(name) {
            return Some(task);
        }

        if name.contains("mmlu_") {
            return self.tasks.iter().find(|t| t.id.starts_with("mmlu"));
        }

        None
    }

    /// Resolve the model named somewhere in `text`.
    ///
    /// The longest matching alias token wins; equal lengths keep catalog order.
    pub fn resolve_model(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        let mut best: Option<&ModelAlias> = None;

        for alias in &self.models {
            if !haystack.contains(&alias.token.to_lowercase()) {
                continue;
            }
            match best {
                Some(current) if current.token.len() >= alias.token.len() => {}
                _ => best = Some(alias),
            }
        }

        best.map(|alias| alias.model.as_str())
    }

    /// Sort discovered models: configured order first, then discovery order
    pub fn order_models(&self, discovered: &[String]) -> Vec<String> {
        let mut ordered: Vec<String> = self
            .model_order
            .iter()
            .filter(|m| discovered.contains(m))
            .cloned()
            .collect();

        for model in discovered {
            if !ordered.contains(model) {
                ordered.push(model.clone());
            }
        }

        ordered
    }

    /// Display name for a task id, falling back to the id itself
    pub fn task_display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.task(id).map(|t| t.display_name.as_str()).unwrap_or(id)
    }
}
