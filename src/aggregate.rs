//! Scan a comparison directory and build one table per task

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Method};
use crate::error::{Error, Result};
use crate::identity::{Identity, Unresolved};
use crate::results::EvaluationDocument;
use crate::table::ComparisonTable;

/// Why a result file did not contribute to the tables
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Model or method missing from the file name
    Unidentified(Unresolved),
    /// File could not be read
    Unreadable(String),
    /// File is not a valid result document
    Malformed(String),
    /// Document has no `results` section
    MissingResults,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unidentified(what) => write!(f, "cannot determine identity: {}", what),
            SkipReason::Unreadable(err) => write!(f, "cannot read file: {}", err),
            SkipReason::Malformed(err) => write!(f, "malformed JSON: {}", err),
            SkipReason::MissingResults => f.write_str("no results field"),
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Scores were taken from the file
    Loaded {
        /// Cells written
        tasks: usize,
    },
    /// File ignored
    Skipped {
        /// Cause
        reason: SkipReason,
    },
}

/// Per-file aggregation record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    /// Result file
    pub path: PathBuf,
    /// Identity inferred from the file name
    pub identity: Option<Identity>,
    /// Outcome
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    /// Whether the file contributed scores
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, FileStatus::Loaded { .. })
    }
}

/// Tables built from a comparison directory
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Row labels shared by every table
    pub models: Vec<String>,
    /// Column labels shared by every table, `base` first
    pub methods: Vec<Method>,
    /// One table per configured task, in catalog order
    pub tables: Vec<ComparisonTable>,
    /// One record per JSON file, in scan order
    pub outcomes: Vec<FileOutcome>,
}

impl Aggregation {
    /// Table of a task
    pub fn table(&self, task: &str) -> Option<&ComparisonTable> {
        self.tables.iter().find(|t| t.task() == task)
    }

    /// Number of files that contributed scores
    pub fn loaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    /// Files that were ignored
    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }
}

/// Builds comparison tables from result files
#[derive(Debug, Clone)]
pub struct Aggregator {
    catalog: Catalog,
}

impl Aggregator {
    /// Create an aggregator over a catalog
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Catalog in use
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Aggregate every `*.json` file in `dir`
    pub fn aggregate(&self, dir: &Path) -> Result<Aggregation> {
        self.aggregate_with(dir, |_| {})
    }

    /// Aggregate, calling `on_file` before each file is loaded
    pub fn aggregate_with<F>(&self, dir: &Path, mut on_file: F) -> Result<Aggregation>
    where
        F: FnMut(&Path),
    {
        let files = list_result_files(dir)?;
        info!("Found {} result files in {}", files.len(), dir.display());

        let identities: Vec<(PathBuf, std::result::Result<Identity, Unresolved>)> = files
            .into_iter()
            .map(|path| {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                let identity = Identity::from_file_name(name, &self.catalog);
                (path, identity)
            })
            .collect();

        let (models, methods) = self.discover(&identities);
        info!("Detected models: {:?}", models);
        info!("Detected methods: {:?}", methods);

        let mut tables: Vec<ComparisonTable> = self
            .catalog
            .tasks
            .iter()
            .map(|task| ComparisonTable::new(task.id.clone(), models.clone(), methods.clone()))
            .collect();

        let mut outcomes = Vec::with_capacity(identities.len());
        let mut sources: Vec<(Identity, PathBuf)> = Vec::new();

        for (path, identity) in identities {
            on_file(&path);

            let identity = match identity {
                Ok(identity) => identity,
                Err(unresolved) => {
                    warn!("Skipping {}: cannot determine identity ({})", path.display(), unresolved);
                    outcomes.push(FileOutcome {
                        path,
                        identity: None,
                        status: FileStatus::Skipped {
                            reason: SkipReason::Unidentified(unresolved),
                        },
                    });
                    continue;
                }
            };

            debug!("Parsed {}: model={}, method={}", path.display(), identity.model, identity.method);

            let status = match load_document(&path) {
                Ok(document) => {
                    if let Some((_, previous)) = sources
                        .iter()
                        .find(|(id, _)| id.model == identity.model && id.method == identity.method)
                    {
                        warn!(
                            "{} overrides scores for {}/{} from {}",
                            path.display(),
                            identity.model,
                            identity.method,
                            previous.display()
                        );
                    }
                    sources.push((identity.clone(), path.clone()));

                    let written = self.fill_tables(&mut tables, &identity, &document);
                    FileStatus::Loaded { tasks: written }
                }
                Err(reason) => {
                    warn!("Skipping {}: {}", path.display(), reason);
                    FileStatus::Skipped { reason }
                }
            };

            outcomes.push(FileOutcome {
                path,
                identity: Some(identity),
                status,
            });
        }

        if !outcomes.iter().any(FileOutcome::is_loaded) {
            warn!("No result files found. Run the evaluation first.");
            return Err(Error::NoResults(dir.to_path_buf()));
        }

        for table in &mut tables {
            table.fill_missing(0.0);
        }

        Ok(Aggregation {
            models,
            methods,
            tables,
            outcomes,
        })
    }

    /// Collect row and column labels from resolvable file names
    fn discover(
        &self,
        identities: &[(PathBuf, std::result::Result<Identity, Unresolved>)],
    ) -> (Vec<String>, Vec<Method>) {
        let mut discovered_models: Vec<String> = Vec::new();
        let mut methods: BTreeSet<Method> = BTreeSet::new();

        for identity in identities.iter().filter_map(|(_, id)| id.as_ref().ok()) {
            if !discovered_models.contains(&identity.model) {
                discovered_models.push(identity.model.clone());
            }
            methods.insert(identity.method);
        }

        let mut models = self.catalog.order_models(&discovered_models);
        if models.is_empty() {
            warn!(
                "No models detected, falling back to '{}'",
                self.catalog.fallback_model
            );
            models.push(self.catalog.fallback_model.clone());
        }

        if methods.is_empty() {
            warn!(
                "No methods detected, falling back to '{}'",
                self.catalog.fallback_method
            );
            methods.insert(self.catalog.fallback_method);
        }

        (models, methods.into_iter().collect())
    }

    fn fill_tables(
        &self,
        tables: &mut [ComparisonTable],
        identity: &Identity,
        document: &EvaluationDocument,
    ) -> usize {
        let mut written = 0;

        for (task, score) in document.task_scores(&self.catalog) {
            if !(0.0..=100.0).contains(&score.percent) {
                debug!("{} score for {} is outside [0, 100]: {}", task, identity, score.percent);
            }
            let Some(table) = tables.iter_mut().find(|t| t.task() == task) else {
                continue;
            };
            if table.set(&identity.model, identity.method, score.percent).is_some() {
                written += 1;
            }
        }

        written
    }
}

fn load_document(path: &Path) -> std::result::Result<EvaluationDocument, SkipReason> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let document =
        EvaluationDocument::parse(&content).map_err(|e| SkipReason::Malformed(e.to_string()))?;

    if document.results.is_none() {
        return Err(SkipReason::MissingResults);
    }

    Ok(document)
}

/// `*.json` files directly inside `dir`, sorted by name
pub fn list_result_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
