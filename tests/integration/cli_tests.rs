//! CLI integration tests
//!
//! Drive the `peft-compare` binary against temporary result trees.

use super::fixtures::*;
use super::init_test_logging;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Run the binary with `config` and capture output
fn run_cli_command(config: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_peft-compare"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("PEFT_COMPARE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run peft-compare");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_cli_help_command() {
    init_test_logging();

    let output = Command::new(env!("CARGO_BIN_EXE_peft-compare"))
        .arg("--help")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Help command failed");
    for subcommand in ["analyze", "capture", "compare", "inspect", "config", "completions"] {
        assert!(stdout.contains(subcommand), "missing {} in help", subcommand);
    }
}

#[test]
fn test_cli_analyze_writes_tables() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let layout = populate_results(&root);

    let (stdout, stderr, success) = run_cli_command(&config, &["analyze"]);
    if !success {
        eprintln!("STDOUT: {}", stdout);
        eprintln!("STDERR: {}", stderr);
    }

    assert!(success, "Analyze command failed");
    assert!(stdout.contains("HellaSwag (commonsense reasoning)"));
    assert!(stdout.contains("Improvement over base"));

    for task in ["hellaswag", "gsm8k", "mmlu_high_school_computer_science"] {
        assert!(layout.comparison_csv(task).exists(), "no table for {}", task);
        assert!(layout.improvement_csv(task).exists(), "no improvement for {}", task);
    }
    assert!(layout.figures_dir().is_dir());
}

#[test]
fn test_cli_analyze_json_summary() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let layout = populate_results(&root);

    let (stdout, stderr, success) = run_cli_command(&config, &["--json", "analyze", "--no-csv"]);
    assert!(success, "Analyze failed: {}", stderr);

    let summary: Value = serde_json::from_str(&stdout).expect("stdout is not JSON");
    assert_eq!(summary["models"], serde_json::json!(["tinyllama", "phi2"]));
    // rows follow report order, not name order
    assert_eq!(summary["tables"][0]["rows"][0]["model"], "tinyllama");
    assert_eq!(summary["tables"][0]["rows"][1]["model"], "phi2");
    assert_eq!(summary["methods"], serde_json::json!(["base", "lora", "qlora"]));
    assert_eq!(summary["tables"].as_array().unwrap().len(), 3);
    assert_eq!(summary["files"].as_array().unwrap().len(), 5);

    assert!(!layout.comparison_csv("hellaswag").exists());
}

#[test]
fn test_cli_analyze_missing_directory() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let missing = root.join("does-not-exist");

    let (_, stderr, success) =
        run_cli_command(&config, &["analyze", "--input", missing.to_str().unwrap()]);

    assert!(!success);
    assert!(stderr.contains("Results directory not found"));
}

#[test]
fn test_cli_analyze_empty_directory() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);

    let (_, stderr, success) = run_cli_command(&config, &["analyze"]);

    assert!(!success);
    assert!(stderr.contains("No result files could be loaded"));
}

#[test]
fn test_cli_capture_refuses_overwrite() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let source = write_document(
        &root.join("harness"),
        "results.json",
        &harness_document("./models/mistral-instruction-qlora", 0.5, 0.5, 0.5),
    );
    let source = source.to_str().unwrap();

    let (stdout, stderr, success) = run_cli_command(&config, &["capture", source, "--no-backup"]);
    assert!(success, "Capture failed: {} {}", stdout, stderr);

    let destination = root
        .join("results")
        .join("model_comparison")
        .join("mistral_qlora.json");
    assert!(destination.exists());
    assert!(fs::read_dir(root.join("results").join("raw_data"))
        .unwrap()
        .next()
        .is_none());

    let (_, stderr, success) = run_cli_command(&config, &["capture", source]);
    assert!(!success);
    assert!(stderr.contains("Output already exists"));

    let (_, _, success) = run_cli_command(&config, &["capture", source, "--force"]);
    assert!(success);
}

#[test]
fn test_cli_capture_with_overrides() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let source = write_document(
        &root.join("harness"),
        "run.json",
        &harness_document("google/gemma-2b", 0.5, 0.5, 0.5),
    );

    let (stdout, stderr, success) = run_cli_command(
        &config,
        &[
            "--json",
            "capture",
            source.to_str().unwrap(),
            "--model",
            "gemma",
            "--method",
            "base",
        ],
    );
    assert!(success, "Capture failed: {}", stderr);

    let outcome: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(outcome["identity"]["model"], "gemma2b");
    assert_eq!(outcome["identity"]["method"], "base");
    assert!(outcome["backup"].is_string());
}

#[test]
fn test_cli_inspect_and_compare() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let layout = populate_results(&root);
    let base = layout.comparison_dir().join("tinyllama_base.json");
    let lora = layout.comparison_dir().join("tinyllama_lora.json");

    let (stdout, _, success) = run_cli_command(&config, &["inspect", lora.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("identity:   tinyllama/lora"));
    assert!(stdout.contains("HellaSwag (commonsense reasoning): 75.0 [acc,none]"));

    let (stdout, _, success) = run_cli_command(
        &config,
        &["compare", base.to_str().unwrap(), lora.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("HellaSwag (commonsense reasoning): 50.00 vs 75.00 (+25.00)"));
}

#[test]
fn test_cli_config_init() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = root.join("config").join("peft-compare.yaml");

    let (_, stderr, success) = run_cli_command(&config, &["config", "init"]);
    assert!(success, "Init failed: {}", stderr);
    assert!(config.exists());

    let (_, _, success) = run_cli_command(&config, &["config", "init"]);
    assert!(!success, "Init must not overwrite without --force");

    let (stdout, _, success) = run_cli_command(&config, &["config", "show"]);
    assert!(success);
    assert!(stdout.contains("model_comparison"));
}

#[test]
fn test_cli_missing_config_file() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let (_, stderr, success) = run_cli_command(&root.join("absent.yaml"), &["analyze"]);

    assert!(!success);
    assert!(stderr.contains("Configuration file not found"));
}

#[test]
fn test_cli_quiet_analyze_prints_only_report() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let layout = populate_results(&root);

    let (stdout, stderr, success) = run_cli_command(&config, &["-q", "analyze"]);
    assert!(success, "Analyze failed: {}", stderr);

    assert!(stdout.contains("HellaSwag (commonsense reasoning)"));
    assert!(!stdout.contains("Saved"));
    assert!(!stdout.contains("Loaded 5 of 5"));
    assert!(stderr.is_empty(), "unexpected stderr: {}", stderr);
    assert!(layout.comparison_csv("hellaswag").exists());
}

#[test]
fn test_cli_capture_unlisted_model_fails() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let source = write_document(
        &root.join("harness"),
        "results.json",
        &harness_document("models/qwen_0.5b-instruction-lora", 0.5, 0.5, 0.5),
    );

    let (_, stderr, success) = run_cli_command(&config, &["capture", source.to_str().unwrap()]);

    assert!(!success);
    assert!(stderr.contains("not in the catalog"));
    assert!(stderr.contains("catalog.models"));
}

#[test]
fn test_cli_error_reports_context_chain() {
    init_test_logging();

    let (_temp_dir, root) = create_test_dir();
    let config = write_test_config(&root);
    let blocked = root.join("blocked");
    fs::write(&blocked, "not a directory").unwrap();

    let (_, stderr, success) = run_cli_command(
        &config,
        &["--results-dir", blocked.to_str().unwrap(), "analyze"],
    );

    assert!(!success);
    assert!(stderr.contains("Failed to create results directories"));
    // the underlying cause follows the context
    assert!(stderr.contains("IO error"));
}
