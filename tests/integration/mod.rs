//! End-to-end tests: capturing harness output, aggregating result
//! directories and driving the command-line interface.

mod cli_tests;
mod error_tests;
mod workflow_tests;

/// Common test initialization
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("peft_compare=debug")
        .try_init();
}
