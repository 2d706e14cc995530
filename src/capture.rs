//! Store harness output under the comparison layout

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::{Catalog, Method};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::layout::ResultsLayout;
use crate::results::EvaluationDocument;

/// What to capture and how
#[derive(Debug, Clone, Default)]
pub struct CaptureRequest {
    /// Harness result file
    pub source: PathBuf,
    /// Model override
    pub model: Option<String>,
    /// Method override
    pub method: Option<Method>,
    /// Merged-model override
    pub merged: Option<bool>,
    /// Replace an existing result file
    pub force: bool,
    /// Keep a timestamped copy under the raw data directory
    pub backup: bool,
}

/// Files written by a capture
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    /// Identity the document was filed under
    pub identity: Identity,
    /// Result file in the comparison directory
    pub destination: PathBuf,
    /// Backup copy, if any
    pub backup: Option<PathBuf>,
}

/// Capture `request.source` now
pub fn capture(
    request: &CaptureRequest,
    layout: &ResultsLayout,
    catalog: &Catalog,
) -> Result<CaptureOutcome> {
    capture_at(request, layout, catalog, Local::now())
}

/// Capture with an explicit timestamp for the backup name
pub fn capture_at(
    request: &CaptureRequest,
    layout: &ResultsLayout,
    catalog: &Catalog,
    now: DateTime<Local>,
) -> Result<CaptureOutcome> {
    let document = EvaluationDocument::load_with_results(&request.source)?;
    let identity = resolve_identity(request, &document, catalog)?;
    info!("Capturing {} as {}", request.source.display(), identity);

    layout.ensure_directories()?;

    let destination = layout.result_file(&identity);
    if destination.exists() && !request.force {
        return Err(Error::OutputExists(destination));
    }

    document.write(&destination)?;
    info!("Saved results to {}", destination.display());

    let backup = if request.backup {
        let stem = destination
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("result");
        let path = layout
            .raw_data_dir()
            .join(format!("{}_{}.json", stem, now.format("%Y%m%d_%H%M%S")));
        document.write(&path)?;
        info!("Backup saved to {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(CaptureOutcome {
        identity,
        destination,
        backup,
    })
}

/// Explicit overrides first, then the `pretrained=` model path, then the
/// source file name.
///
/// The model must be one the catalog resolves from the stored file name,
/// otherwise aggregation would skip the file.
fn resolve_identity(
    request: &CaptureRequest,
    document: &EvaluationDocument,
    catalog: &Catalog,
) -> Result<Identity> {
    let inferred = document
        .pretrained()
        .and_then(|path| {
            debug!("Inferring identity from model path {}", path);
            Identity::from_model_dir(&path, catalog).ok()
        })
        .or_else(|| file_name(&request.source).and_then(|n| Identity::from_file_name(n, catalog).ok()));

    let model = match (&request.model, &inferred) {
        (Some(model), _) => catalog
            .resolve_model(model)
            .map(str::to_string)
            .ok_or_else(|| Error::UnknownModel(model.clone()))?,
        (None, Some(identity)) => identity.model.clone(),
        (None, None) => return Err(Error::unknown_identity(request.source.display().to_string())),
    };

    let method = request
        .method
        .or_else(|| inferred.as_ref().map(|i| i.method))
        .ok_or_else(|| Error::unknown_identity(request.source.display().to_string()))?;

    let merged = request
        .merged
        .or_else(|| inferred.as_ref().map(|i| i.merged))
        .unwrap_or(false);

    let identity = Identity::new(model, method).merged(merged);
    if Identity::from_file_name(&identity.file_name(), catalog).as_ref() != Ok(&identity) {
        return Err(Error::UnknownModel(identity.model));
    }

    Ok(identity)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
