//! Table renderer: tab-separated header plus one line per row.

use crate::value::Table;

use super::limit::RowLimit;
use super::{RenderError, NEWLINE, TAB};

/// Renders `table` as a header line followed by data rows, stopping once the
/// row cap is reached. The check runs before each row, so a truncated table
/// carries exactly `max_rows` rows.
pub(super) fn render(table: &Table, limit: &mut RowLimit) -> Result<String, RenderError> {
    let rows = validate(table)?;

    let mut out = String::new();
    for (i, name) in table.names.iter().enumerate() {
        if i > 0 {
            out.push(TAB);
        }
        out.push_str(name);
    }
    out.push(NEWLINE);

    let mut emitted = 0;
    for row in 0..rows {
        if limit.should_stop(emitted) {
            limit.mark_exceeded();
            return Ok(out);
        }
        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                out.push(TAB);
            }
            let cell = column
                .cell(row)
                .ok_or_else(|| RenderError::MalformedTable(format!("no cell at row {}", row)))?;
            out.push_str(&cell);
        }
        out.push(NEWLINE);
        emitted += 1;
    }
    Ok(out)
}

/// Checks the name/column pairing and uniform row count, returning the row
/// count. The engine does not guarantee well-formed tables on the wire, so
/// this fails with a reported error instead of indexing out of bounds.
pub(super) fn validate(table: &Table) -> Result<usize, RenderError> {
    if table.names.len() != table.columns.len() {
        return Err(RenderError::MalformedTable(format!(
            "{} column names but {} data columns",
            table.names.len(),
            table.columns.len()
        )));
    }
    let rows = table.row_count();
    for (name, column) in table.names.iter().zip(&table.columns) {
        if column.len() != rows {
            return Err(RenderError::MalformedTable(format!(
                "column '{}' has {} rows, expected {}",
                name,
                column.len(),
                rows
            )));
        }
    }
    Ok(rows)
}
