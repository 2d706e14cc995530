//! Plain-text renderings of comparison tables

use crate::aggregate::Aggregation;
use crate::catalog::{Catalog, Method};
use crate::table::ComparisonTable;

/// Format a score cell
pub fn format_score(value: Option<f64>, precision: usize) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) => format!("{:.*}", precision, v),
    }
}

/// Format an improvement cell with an explicit sign
pub fn format_improvement(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:+.*}%", precision, v),
        other => format_score(other, precision),
    }
}

/// Scores of one task, models × methods
pub fn render_horizontal(table: &ComparisonTable, catalog: &Catalog, precision: usize) -> String {
    let columns: Vec<String> = table
        .methods()
        .iter()
        .map(|m| m.display_name().to_string())
        .collect();

    let rows = table
        .models()
        .iter()
        .map(|model| {
            let cells = table
                .row(model)
                .into_iter()
                .map(|v| format_score(v, precision))
                .collect();
            (model.clone(), cells)
        })
        .collect::<Vec<_>>();

    render_grid(catalog.task_display_name(table.task()), &columns, &rows)
}

/// Scores of one method, models × tasks
pub fn render_vertical(
    aggregation: &Aggregation,
    method: Method,
    catalog: &Catalog,
    precision: usize,
) -> String {
    let columns: Vec<String> = aggregation
        .tables
        .iter()
        .map(|t| catalog.task_display_name(t.task()).to_string())
        .collect();

    let rows = aggregation
        .models
        .iter()
        .map(|model| {
            let cells = aggregation
                .tables
                .iter()
                .map(|t| format_score(t.get(model, method), precision))
                .collect();
            (model.clone(), cells)
        })
        .collect::<Vec<_>>();

    render_grid(
        &format!("{} across models", method.display_name()),
        &columns,
        &rows,
    )
}

/// Relative improvement of one task, models × tuned methods
pub fn render_improvement(table: &ComparisonTable, catalog: &Catalog, precision: usize) -> String {
    let columns: Vec<String> = table
        .methods()
        .iter()
        .map(|m| m.display_name().to_string())
        .collect();

    let rows = table
        .models()
        .iter()
        .map(|model| {
            let cells = table
                .row(model)
                .into_iter()
                .map(|v| format_improvement(v, precision))
                .collect();
            (model.clone(), cells)
        })
        .collect::<Vec<_>>();

    render_grid(
        &format!(
            "Improvement over base: {}",
            catalog.task_display_name(table.task())
        ),
        &columns,
        &rows,
    )
}

/// Left-aligned label column, right-aligned value columns
fn render_grid(title: &str, columns: &[String], rows: &[(String, Vec<String>)]) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once("model".len()))
        .max()
        .unwrap_or(0);

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|(_, cells)| cells.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    let mut header = format!("{:<width$}", "model", width = label_width);
    for (column, width) in columns.iter().zip(&widths) {
        header.push_str(&format!("  {:>width$}", column, width = *width));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let rule_len = label_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for (label, cells) in rows {
        let mut line = format!("{:<width$}", label, width = label_width);
        for (cell, width) in cells.iter().zip(&widths) {
            line.push_str(&format!("  {:>width$}", cell, width = *width));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
