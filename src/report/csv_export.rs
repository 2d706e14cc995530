//! CSV export of comparison tables

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::table::ComparisonTable;

/// Write a table as CSV: `model,<method>...` header, one row per model.
///
/// Scores keep full precision; NaN is written as `NaN` and unset cells are
/// left empty.
pub fn write_table<W: Write>(table: &ComparisonTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["model".to_string()];
    header.extend(table.methods().iter().map(|m| m.to_string()));
    csv.write_record(&header)?;

    for model in table.models() {
        let mut record = vec![model.clone()];
        record.extend(
            table
                .row(model)
                .into_iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write a table to a CSV file
pub fn write_table_file(table: &ComparisonTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_table(table, file)
}
