//! Error handling and edge case tests
//!
//! Broken, unidentifiable and duplicate result files must not abort an
//! analysis; capture must refuse input it cannot file.

use super::fixtures::*;
use super::init_test_logging;
use approx::assert_relative_eq;
use peft_compare::capture::{capture, CaptureRequest};
use peft_compare::{
    Aggregator, Catalog, Error, FileStatus, Method, ResultsLayout, SkipReason, Unresolved,
};
use serde_json::json;
use std::fs;

#[test]
fn test_broken_files_are_skipped() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let dir = root.join("comparison");

    write_document(
        &dir,
        "tinyllama_lora.json",
        &harness_document("./models/tinyllama-instruction-lora", 0.5, 0.5, 0.5),
    );
    fs::write(dir.join("phi2_lora.json"), "{ not json").unwrap();
    write_document(&dir, "phi2_full.json", &json!({"config": {"model": "hf"}}));
    write_document(&dir, "notes.json", &json!({"results": {}}));
    fs::write(dir.join("README.md"), "ignored").unwrap();

    let aggregation = Aggregator::new(Catalog::default()).aggregate(&dir).unwrap();

    // README.md is not a result file
    assert_eq!(aggregation.outcomes.len(), 4);
    assert_eq!(aggregation.loaded(), 1);

    let reason = |name: &str| {
        aggregation
            .outcomes
            .iter()
            .find(|o| o.path.ends_with(name))
            .and_then(|o| match &o.status {
                FileStatus::Skipped { reason } => Some(reason.clone()),
                FileStatus::Loaded { .. } => None,
            })
    };

    assert!(matches!(reason("phi2_lora.json"), Some(SkipReason::Malformed(_))));
    assert_eq!(reason("phi2_full.json"), Some(SkipReason::MissingResults));
    assert_eq!(
        reason("notes.json"),
        Some(SkipReason::Unidentified(Unresolved::Model))
    );

    // discovered from names even though the files were unusable
    assert_eq!(aggregation.models, vec!["tinyllama", "phi2"]);
    assert_eq!(aggregation.methods, vec![Method::Full, Method::Lora]);

    let table = aggregation.table("hellaswag").unwrap();
    assert_relative_eq!(table.get("phi2", Method::Lora).unwrap(), 0.0);
}

#[test]
fn test_later_file_wins_duplicate_cell() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let dir = root.join("comparison");

    write_document(&dir, "tinyllama_lora.json", &reconstructed_document(0.25, 0.25));
    write_document(&dir, "tinyllama_lora_merged.json", &reconstructed_document(0.5, 0.5));

    let aggregation = Aggregator::new(Catalog::default()).aggregate(&dir).unwrap();

    assert_eq!(aggregation.loaded(), 2);
    let table = aggregation.table("gsm8k").unwrap();
    assert_relative_eq!(table.get("tinyllama", Method::Lora).unwrap(), 50.0);
}

#[test]
fn test_no_loadable_results() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let dir = root.join("comparison");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("mistral_lora.json"), "[]").unwrap();

    let result = Aggregator::new(Catalog::default()).aggregate(&dir);
    assert!(matches!(result, Err(Error::NoResults(_))));

    let result = Aggregator::new(Catalog::default()).aggregate(&root.join("missing"));
    assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
}

#[test]
fn test_capture_unknown_identity() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = ResultsLayout::with_root(root.join("results"));
    let source = write_document(
        &root.join("harness"),
        "results_2024.json",
        &harness_document("/tmp/checkpoint-500", 0.5, 0.5, 0.5),
    );

    let request = CaptureRequest {
        source: source.clone(),
        ..Default::default()
    };
    let result = capture(&request, &layout, &Catalog::default());
    assert!(matches!(result, Err(Error::UnknownIdentity(_))));

    // a model alone is not enough
    let request = CaptureRequest {
        source,
        model: Some("tinyllama".to_string()),
        ..Default::default()
    };
    let result = capture(&request, &layout, &Catalog::default());
    assert!(matches!(result, Err(Error::UnknownIdentity(_))));
}

#[test]
fn test_capture_requires_results() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = ResultsLayout::with_root(root.join("results"));
    let source = write_document(&root, "tinyllama_lora.json", &json!({"versions": {}}));

    let request = CaptureRequest {
        source,
        ..Default::default()
    };
    let result = capture(&request, &layout, &Catalog::default());

    assert!(matches!(result, Err(Error::MissingResults(_))));
    assert!(!layout.comparison_dir().exists());
}
