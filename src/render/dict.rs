//! Dictionary renderer: key/value lines, or a table merge for keyed tables.

use crate::value::{Table, Value};

use super::limit::RowLimit;
use super::{table, RenderError, NEWLINE, TAB};

pub(super) fn render(keys: &Value, values: &Value, limit: &mut RowLimit) -> Result<String, RenderError> {
    // Keyed table: both sides are tables, merged into one before rendering.
    if let (Value::Table(a), Value::Table(b)) = (keys, values) {
        let merged = merge(a, b);
        return table::render(&merged, limit);
    }

    let (keys, values) = match (keys, values) {
        (Value::List(k), Value::List(v)) => (k, v),
        _ => {
            return Err(RenderError::MalformedDict(
                "sides must be two lists or two tables".into(),
            ))
        }
    };
    if keys.len() != values.len() {
        return Err(RenderError::MalformedDict(format!(
            "{} keys but {} values",
            keys.len(),
            values.len()
        )));
    }

    // The cap counts separator lines, so the check only bites from the
    // second entry on.
    let mut out = String::new();
    let mut emitted = 0;
    for (i, (key, value)) in keys.iter().zip(values).enumerate() {
        if i > 0 {
            out.push(NEWLINE);
            emitted += 1;
        }
        if limit.should_stop(emitted) {
            limit.mark_exceeded();
            return Ok(out);
        }
        out.push_str(&key.to_string());
        out.push(TAB);
        out.push_str(&value.to_string());
    }
    Ok(out)
}

/// Concatenates column names and column data of two tables, key side first.
/// Names are not de-duplicated. A row-count mismatch between the sides
/// surfaces when the merged table is validated.
fn merge(a: &Table, b: &Table) -> Table {
    let names = a.names.iter().chain(&b.names).cloned().collect();
    let columns = a.columns.iter().chain(&b.columns).cloned().collect();
    Table::new(names, columns)
}
