//! Model/method identity inferred from file and directory names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::catalog::{Catalog, Method};

/// Marker between model id and method in trained model directory names
const INSTRUCTION_MARKER: &str = "-instruction-";

/// Which coordinate of a result could not be inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// No known model token
    Model,
    /// No method token
    Method,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::Model => f.write_str("no known model in name"),
            Unresolved::Method => f.write_str("no fine-tuning method in name"),
        }
    }
}

/// Table coordinates of one evaluation result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Canonical model id
    pub model: String,
    /// Fine-tuning method
    pub method: Method,
    /// Adapter weights were merged into the base model
    #[serde(default)]
    pub merged: bool,
}

impl Identity {
    /// Create an identity
    pub fn new(model: impl Into<String>, method: Method) -> Self {
        Self {
            model: model.into(),
            method,
            merged: false,
        }
    }

    /// Mark the identity as a merged model
    pub fn merged(mut self, merged: bool) -> Self {
        self.merged = merged;
        self
    }

    /// Result file name under the comparison directory
    pub fn file_name(&self) -> String {
        if self.merged {
            format!("{}_{}_merged.json", self.model, self.method)
        } else {
            format!("{}_{}.json", self.model, self.method)
        }
    }

    /// Resolve a result file name such as `tinyllama_1.1b_qlora_merged.json`
    pub fn from_file_name(name: &str, catalog: &Catalog) -> Result<Self, Unresolved> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_lowercase();

        Self::from_stem(&stem, catalog)
    }

    /// Resolve a model directory such as
    /// `models/tinyllama_1.1b-instruction-lora-merged`.
    ///
    /// Only the last path component is considered. Names without the
    /// `-instruction-` marker fall back to substring resolution.
    pub fn from_model_dir(path: &str, catalog: &Catalog) -> Result<Self, Unresolved> {
        let component = path
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path)
            .to_lowercase();

        if let Some((id, rest)) = component.split_once(INSTRUCTION_MARKER) {
            let (method_token, merged) = match rest.strip_suffix("-merged") {
                Some(token) => (token, true),
                None => (rest, false),
            };

            if let Ok(method) = method_token.parse::<Method>() {
                let model = catalog
                    .resolve_model(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string());
                return Ok(Identity::new(model, method).merged(merged));
            }
        }

        Self::from_stem(&component, catalog)
    }

    fn from_stem(stem: &str, catalog: &Catalog) -> Result<Self, Unresolved> {
        let model = catalog.resolve_model(stem).ok_or(Unresolved::Model)?;
        let method = resolve_method(stem).ok_or(Unresolved::Method)?;

        Ok(Identity::new(model, method).merged(stem.contains("merged")))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.model, self.method)?;
        if self.merged {
            f.write_str(" (merged)")?;
        }
        Ok(())
    }
}

/// Find the method token in a lowercased name.
///
/// `qlora` contains `lora`, so the longest matching token wins.
pub fn resolve_method(stem: &str) -> Option<Method> {
    Method::ALL
        .iter()
        .copied()
        .filter(|m| stem.contains(m.as_str()))
        .max_by_key(|m| m.as_str().len())
}
