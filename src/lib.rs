//! peft-compare - benchmark result aggregation for fine-tuning comparisons
//!
//! This crate collects evaluation-harness result files produced for full
//! fine-tuning, LoRA and QLoRA runs, files them into per-task comparison
//! tables and derives reports such as relative improvement over the base
//! model.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod aggregate;
pub mod capture;
pub mod catalog;
#[allow(missing_docs)]
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod identity;
pub mod inspect;
pub mod layout;
pub mod report;
pub mod results;
pub mod table;

// Re-exports
pub use aggregate::{Aggregation, Aggregator, FileOutcome, FileStatus, SkipReason};
pub use catalog::{Catalog, Method, ModelAlias, TaskSpec};
pub use config::{Config, LayoutConfig, ReportConfig};
pub use error::{Error, Result};
pub use identity::{Identity, Unresolved};
pub use layout::ResultsLayout;
pub use report::{relative_improvement, Report};
pub use results::{EvaluationDocument, PrimaryScore, RunConfig, TaskMetrics};
pub use table::ComparisonTable;
