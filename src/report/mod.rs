//! Reports derived from an [`Aggregation`]
//!
//! Every task gets a score table and, when the base model was evaluated, a
//! relative-improvement table. Both can be written as CSV, rendered as text or
//! serialized as one JSON summary.

pub mod csv_export;
pub mod improvement;
pub mod text;

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::aggregate::{Aggregation, FileOutcome};
use crate::catalog::{Catalog, Method};
use crate::error::Result;
use crate::layout::ResultsLayout;
use crate::table::{ComparisonTable, TableView};

pub use improvement::{improvement_table, relative_improvement};

/// Score and improvement tables ready for output
#[derive(Debug, Clone)]
pub struct Report<'a> {
    aggregation: &'a Aggregation,
    improvements: Vec<ComparisonTable>,
}

impl<'a> Report<'a> {
    /// Build a report, optionally with improvement tables
    pub fn build(aggregation: &'a Aggregation, with_improvement: bool) -> Self {
        let improvements = if !with_improvement {
            Vec::new()
        } else if !aggregation.methods.contains(&Method::Base) {
            warn!("No base model results; skipping improvement tables");
            Vec::new()
        } else {
            aggregation.tables.iter().filter_map(improvement_table).collect()
        };

        Self {
            aggregation,
            improvements,
        }
    }

    /// Underlying aggregation
    pub fn aggregation(&self) -> &Aggregation {
        self.aggregation
    }

    /// Improvement tables, one per task
    pub fn improvements(&self) -> &[ComparisonTable] {
        &self.improvements
    }

    /// Write `<task>_comparison.csv` and `<task>_improvement.csv` files
    pub fn write_csv(&self, layout: &ResultsLayout) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for table in &self.aggregation.tables {
            let path = layout.comparison_csv(table.task());
            csv_export::write_table_file(table, &path)?;
            info!("Saved table: {}", path.display());
            written.push(path);
        }

        for table in &self.improvements {
            let path = layout.improvement_csv(table.task());
            csv_export::write_table_file(table, &path)?;
            info!("Saved improvement table: {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Horizontal, vertical and improvement views as text
    pub fn render_text(&self, catalog: &Catalog, precision: usize) -> String {
        let mut sections = Vec::new();

        for table in &self.aggregation.tables {
            sections.push(text::render_horizontal(table, catalog, precision));
        }

        for method in &self.aggregation.methods {
            sections.push(text::render_vertical(self.aggregation, *method, catalog, precision));
        }

        for table in &self.improvements {
            sections.push(text::render_improvement(table, catalog, precision));
        }

        sections.join("\n")
    }

    /// Serializable summary of the whole analysis
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            models: self.aggregation.models.clone(),
            methods: self.aggregation.methods.clone(),
            tables: self.aggregation.tables.iter().map(ComparisonTable::view).collect(),
            improvements: self.improvements.iter().map(ComparisonTable::view).collect(),
            files: self.aggregation.outcomes.clone(),
        }
    }
}

/// JSON output of `analyze`
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Row labels
    pub models: Vec<String>,
    /// Column labels
    pub methods: Vec<Method>,
    /// Score tables
    pub tables: Vec<TableView>,
    /// Improvement tables
    pub improvements: Vec<TableView>,
    /// Per-file outcomes
    pub files: Vec<FileOutcome>,
}
