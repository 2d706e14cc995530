//! Labeled model × method score grid

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Method;

/// Scores of one task, rows indexed by model and columns by method
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    task: String,
    models: Vec<String>,
    methods: Vec<Method>,
    cells: Vec<Option<f64>>,
}

impl ComparisonTable {
    /// Create an empty table
    pub fn new(task: impl Into<String>, models: Vec<String>, methods: Vec<Method>) -> Self {
        let cells = vec![None; models.len() * methods.len()];
        Self {
            task: task.into(),
            models,
            methods,
            cells,
        }
    }

    /// Task id
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Row labels
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Column labels
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    fn index(&self, model: &str, method: Method) -> Option<usize> {
        let row = self.models.iter().position(|m| m == model)?;
        let col = self.methods.iter().position(|m| *m == method)?;
        Some(row * self.methods.len() + col)
    }

    /// Store a score; returns the previous value, or `None` if the
    /// coordinates are outside the table
    pub fn set(&mut self, model: &str, method: Method, value: f64) -> Option<Option<f64>> {
        let idx = self.index(model, method)?;
        Some(self.cells[idx].replace(value))
    }

    /// Score at a cell, `None` when unset or outside the table
    pub fn get(&self, model: &str, method: Method) -> Option<f64> {
        self.index(model, method).and_then(|idx| self.cells[idx])
    }

    /// Replace every unset cell with `value`
    pub fn fill_missing(&mut self, value: f64) {
        for cell in self.cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(value);
        }
    }

    /// Row of a model in column order
    pub fn row(&self, model: &str) -> Vec<Option<f64>> {
        self.methods.iter().map(|m| self.get(model, *m)).collect()
    }

    /// Serializable view, rows in table order
    pub fn view(&self) -> TableView {
        let rows = self
            .models
            .iter()
            .map(|model| TableRow {
                model: model.clone(),
                scores: self
                    .methods
                    .iter()
                    .map(|method| (*method, self.get(model, *method)))
                    .collect(),
            })
            .collect();

        TableView {
            task: self.task.clone(),
            methods: self.methods.clone(),
            rows,
        }
    }
}

/// JSON form of a [`ComparisonTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    /// Task id
    pub task: String,
    /// Column order
    pub methods: Vec<Method>,
    /// One entry per model, in report order
    pub rows: Vec<TableRow>,
}

/// Scores of one model; NaN and unset cells serialize as `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Model id
    pub model: String,
    /// method -> score
    pub scores: BTreeMap<Method, Option<f64>>,
}
