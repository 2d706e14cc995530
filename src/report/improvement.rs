//! Relative improvement of tuned methods over the base model

use tracing::warn;

use crate::catalog::Method;
use crate::table::ComparisonTable;

/// `(tuned - base) / base * 100`.
///
/// NaN when the base score is missing, non-positive or NaN, or when the tuned
/// score is missing or NaN.
pub fn relative_improvement(base: Option<f64>, tuned: Option<f64>) -> f64 {
    match (base, tuned) {
        (Some(base), Some(tuned)) if base > 0.0 && tuned.is_finite() => {
            (tuned - base) / base * 100.0
        }
        _ => f64::NAN,
    }
}

/// Improvement of every tuned method over `base`, per model.
///
/// Returns `None` when the table has no `base` column or no tuned column.
pub fn improvement_table(scores: &ComparisonTable) -> Option<ComparisonTable> {
    if !scores.methods().contains(&Method::Base) {
        return None;
    }

    let tuned: Vec<Method> = scores.methods().iter().copied().filter(Method::is_tuned).collect();
    if tuned.is_empty() {
        return None;
    }

    let mut table = ComparisonTable::new(scores.task(), scores.models().to_vec(), tuned.clone());
    let mut missing_base = Vec::new();

    for model in scores.models() {
        let base = scores.get(model, Method::Base);
        if !base.is_some_and(|b| b > 0.0) {
            missing_base.push(model.as_str());
        }
        for method in &tuned {
            table.set(model, *method, relative_improvement(base, scores.get(model, *method)));
        }
    }

    if !missing_base.is_empty() {
        warn!(
            "Missing base score for {} on {}; their improvement is NaN",
            missing_base.join(", "),
            scores.task()
        );
    }

    Some(table)
}
