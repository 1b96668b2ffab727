//! Value model for results returned by the columnar engine.
//!
//! Everything the engine can hand back is a [`Value`]: a bare atom, an error,
//! a list, a dictionary (two parallel values) or a column-oriented table.
//! Columns carry their element kind as a tagged variant, so cell access is
//! typed instead of reflective.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single result value from the engine. Produced once per query execution
/// and consumed exactly once by the renderer; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The engine signalled failure; carries the backend message.
    Error(String),
    /// No data returned (statements like assignments evaluate to this).
    Null,
    Atom(Atom),
    /// Ordered, possibly heterogeneous sequence.
    List(Vec<Value>),
    /// Parallel key-side and value-side values. Usually two lists of equal
    /// length, or two tables (a keyed table).
    Dict(Box<Value>, Box<Value>),
    Table(Table),
}

/// A scalar element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Atom {
    Bool(bool),
    Long(i64),
    Real(f64),
    Char(char),
    Symbol(String),
    /// A whole character sequence, rendered as one string.
    Str(String),
    Timestamp(DateTime<Utc>),
}

/// Column-oriented table: parallel column names and column data. Uniform row
/// count across columns is expected but not guaranteed by construction; the
/// renderer validates it before iterating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub names: Vec<String>,
    pub columns: Vec<Column>,
}

/// Column data tagged with its element kind. Each variant exposes the same
/// capability: element count plus "give me cell `i` as a string".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Bool(Vec<bool>),
    Long(Vec<i64>),
    Real(Vec<f64>),
    Symbol(Vec<String>),
    /// Character-sequence cells; each cell is already a full string.
    Str(Vec<String>),
    Timestamp(Vec<DateTime<Utc>>),
    /// Mixed column holding arbitrary atoms.
    Mixed(Vec<Atom>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Bool(v) => v.len(),
            Column::Long(v) => v.len(),
            Column::Real(v) => v.len(),
            Column::Symbol(v) => v.len(),
            Column::Str(v) => v.len(),
            Column::Timestamp(v) => v.len(),
            Column::Mixed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `idx` in its canonical string form, or `None` past the end.
    pub fn cell(&self, idx: usize) -> Option<String> {
        match self {
            Column::Bool(v) => v.get(idx).map(|b| b.to_string()),
            Column::Long(v) => v.get(idx).map(|n| n.to_string()),
            Column::Real(v) => v.get(idx).map(|x| x.to_string()),
            Column::Symbol(v) => v.get(idx).cloned(),
            Column::Str(v) => v.get(idx).cloned(),
            Column::Timestamp(v) => v.get(idx).map(format_timestamp),
            Column::Mixed(v) => v.get(idx).map(|a| a.to_string()),
        }
    }
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Self {
        Self { names, columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row count taken from the first column; zero for a column-less table.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Long(n) => write!(f, "{}", n),
            Atom::Real(x) => write!(f, "{}", x),
            Atom::Char(c) => write!(f, "{}", c),
            Atom::Symbol(s) => f.write_str(s),
            Atom::Str(s) => f.write_str(s),
            Atom::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Error(e) => f.write_str(e),
            Value::Null => f.write_str("::"),
            Value::Atom(a) => write!(f, "{}", a),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Dict(k, v) => write!(f, "{}!{}", k, v),
            Value::Table(t) => {
                write!(f, "table({} columns, {} rows)", t.column_count(), t.row_count())
            }
        }
    }
}
