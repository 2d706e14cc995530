//! End-to-end workflow tests
//!
//! Capture harness output, aggregate the comparison directory and export
//! the resulting tables.

use super::fixtures::*;
use super::init_test_logging;
use approx::assert_relative_eq;
use peft_compare::capture::{capture, CaptureRequest};
use peft_compare::{Aggregator, Catalog, Error, Method, ModelAlias, Report, ResultsLayout};
use std::fs;

#[test]
fn test_analyze_result_directory() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = populate_results(&root);

    let aggregation = Aggregator::new(Catalog::default())
        .aggregate(layout.comparison_dir())
        .unwrap();

    assert_eq!(aggregation.models, vec!["tinyllama", "phi2"]);
    assert_eq!(aggregation.methods, vec![Method::Base, Method::Lora, Method::Qlora]);
    assert_eq!(aggregation.loaded(), 5);
    assert_eq!(aggregation.tables.len(), 3);

    let hellaswag = aggregation.table("hellaswag").unwrap();
    assert_relative_eq!(hellaswag.get("tinyllama", Method::Lora).unwrap(), 75.0);
    assert_relative_eq!(hellaswag.get("phi2", Method::Lora).unwrap(), 62.5);
    // never evaluated, filled with zero
    assert_relative_eq!(hellaswag.get("phi2", Method::Qlora).unwrap(), 0.0);

    let gsm8k = aggregation.table("gsm8k").unwrap();
    assert_relative_eq!(gsm8k.get("tinyllama", Method::Lora).unwrap(), 50.0);
    assert_relative_eq!(gsm8k.get("phi2", Method::Lora).unwrap(), 75.0);

    let mmlu = aggregation.table("mmlu_high_school_computer_science").unwrap();
    assert_relative_eq!(mmlu.get("tinyllama", Method::Lora).unwrap(), 37.5);
    assert_relative_eq!(mmlu.get("phi2", Method::Base).unwrap(), 0.0);
}

#[test]
fn test_report_csv_export() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = populate_results(&root);

    let aggregation = Aggregator::new(Catalog::default())
        .aggregate(layout.comparison_dir())
        .unwrap();
    let report = Report::build(&aggregation, true);
    let written = report.write_csv(&layout).unwrap();

    // three score tables and three improvement tables
    assert_eq!(written.len(), 6);
    for path in &written {
        assert!(path.exists(), "{} not written", path.display());
    }

    let scores = fs::read_to_string(layout.comparison_csv("hellaswag")).unwrap();
    assert_eq!(
        scores,
        "model,base,lora,qlora\ntinyllama,50,75,62.5\nphi2,50,62.5,0\n"
    );

    let improvement = fs::read_to_string(layout.improvement_csv("hellaswag")).unwrap();
    assert_eq!(
        improvement,
        "model,lora,qlora\ntinyllama,50,25\nphi2,25,-100\n"
    );

    // phi2 has no MMLU base score
    let mmlu = fs::read_to_string(layout.improvement_csv("mmlu_high_school_computer_science"))
        .unwrap();
    assert!(mmlu.contains("phi2,NaN,NaN"));
}

#[test]
fn test_report_without_base_has_no_improvement() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let dir = root.join("results").join("model_comparison");
    write_document(
        &dir,
        "gemma_lora.json",
        &harness_document("./models/gemma2b-instruction-lora", 0.5, 0.5, 0.5),
    );
    write_document(
        &dir,
        "gemma_full.json",
        &harness_document("./models/gemma2b-instruction-full", 0.75, 0.5, 0.5),
    );

    let aggregation = Aggregator::new(Catalog::default()).aggregate(&dir).unwrap();
    assert_eq!(aggregation.models, vec!["gemma2b"]);

    let report = Report::build(&aggregation, true);
    assert!(report.improvements().is_empty());

    let summary = report.summary();
    assert_eq!(summary.tables.len(), 3);
    assert!(summary.improvements.is_empty());
}

#[test]
fn test_capture_then_analyze() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = ResultsLayout::with_root(root.join("results"));
    let catalog = Catalog::default();

    let runs = [
        ("base_run.json", "microsoft/phi-2", Some(Method::Base), 0.5),
        ("full_run.json", "./models/phi2-instruction-full", None, 0.75),
        ("qlora_run.json", "./models/phi2-instruction-qlora-merged", None, 0.625),
    ];

    for (name, pretrained, method, score) in runs {
        let source = write_document(
            &root.join("harness"),
            name,
            &harness_document(pretrained, score, score, score),
        );
        let request = CaptureRequest {
            source,
            model: Some("phi2".to_string()),
            method,
            backup: true,
            ..Default::default()
        };
        let outcome = capture(&request, &layout, &catalog).unwrap();
        assert!(outcome.destination.exists());
        assert!(outcome.backup.as_ref().is_some_and(|p| p.exists()));
    }

    assert!(layout.comparison_dir().join("phi2_base.json").exists());
    assert!(layout.comparison_dir().join("phi2_full.json").exists());
    assert!(layout.comparison_dir().join("phi2_qlora_merged.json").exists());

    let aggregation = Aggregator::new(catalog).aggregate(layout.comparison_dir()).unwrap();
    assert_eq!(aggregation.models, vec!["phi2"]);
    assert_eq!(
        aggregation.methods,
        vec![Method::Base, Method::Full, Method::Qlora]
    );

    let table = aggregation.table("hellaswag").unwrap();
    assert_relative_eq!(table.get("phi2", Method::Full).unwrap(), 75.0);
    assert_relative_eq!(table.get("phi2", Method::Qlora).unwrap(), 62.5);
}

#[test]
fn test_capture_unlisted_model_needs_alias() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let layout = ResultsLayout::with_root(root.join("results"));
    let source = write_document(
        &root.join("harness"),
        "results.json",
        &harness_document("models/qwen_0.5b-instruction-lora", 0.5, 0.25, 0.25),
    );
    let request = CaptureRequest {
        source,
        ..Default::default()
    };

    // not filed under a name aggregation would skip
    let mut catalog = Catalog::default();
    let result = capture(&request, &layout, &catalog);
    assert!(matches!(result, Err(Error::UnknownModel(_))));
    assert!(!layout.comparison_dir().exists());

    catalog.models.push(ModelAlias::new("qwen", "qwen0.5b"));
    let outcome = capture(&request, &layout, &catalog).unwrap();
    assert!(outcome.destination.ends_with("qwen0.5b_lora.json"));

    let aggregation = Aggregator::new(catalog).aggregate(layout.comparison_dir()).unwrap();
    assert_eq!(aggregation.models, vec!["qwen0.5b"]);
    assert_eq!(aggregation.loaded(), 1);
    let table = aggregation.table("hellaswag").unwrap();
    assert_relative_eq!(table.get("qwen0.5b", Method::Lora).unwrap(), 50.0);
}

#[test]
fn test_full_mmlu_run_keeps_computer_science_score() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let dir = root.join("comparison");
    let mut document = harness_document("./models/phi2-instruction-lora", 0.5, 0.5, 0.25);
    document["results"]["mmlu_high_school_mathematics"] = serde_json::json!({"acc,none": 0.875});
    document["results"]["mmlu_world_religions"] = serde_json::json!({"acc,none": 0.75});
    write_document(&dir, "phi2_lora.json", &document);

    let aggregation = Aggregator::new(Catalog::default()).aggregate(&dir).unwrap();

    let mmlu = aggregation.table("mmlu_high_school_computer_science").unwrap();
    assert_relative_eq!(mmlu.get("phi2", Method::Lora).unwrap(), 25.0);
}
