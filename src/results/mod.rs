//! Evaluation result documents
//!
//! Two producers write these files: the evaluation harness itself, whose metric
//! keys carry a filter suffix (`acc,none`, `exact_match,flexible-extract`), and
//! hand-reconstructed documents that use plain keys (`acc`) or nest metrics
//! under the filter name. Both are read through the same types.

pub mod document;
pub mod metrics;

pub use document::{EvaluationDocument, RunConfig};
pub use metrics::{PrimaryScore, TaskMetrics};
