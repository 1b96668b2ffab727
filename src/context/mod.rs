//! Shared named-value context.
//!
//! Script lines using the `.ctx.` namespace hand a render result to a
//! later execution: `.ctx.name:expr` stores the rendered result of `expr`,
//! and `target:.ctx.name` pulls a stored result back and binds it on the
//! engine under `target`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::render::{OutputKind, RenderedOutput};
use crate::value::{Atom, Column, Table, Value};

pub const CONTEXT_MARKER: &str = ".ctx.";

static PUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.ctx\.([\w.]+):(.+)$").unwrap());
static GET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\w.]+):\.ctx\.([\w.]+)$").unwrap());

/// A context line, split out from plain query lines by the script runner.
#[derive(Debug, PartialEq, Eq)]
pub enum ContextCommand<'a> {
    Put { name: &'a str, expr: &'a str },
    Get { target: &'a str, name: &'a str },
}

/// Recognizes a context command. Lines mentioning the marker that fit
/// neither shape yield `None` and fall through as ordinary query lines.
pub fn parse_command(line: &str) -> Option<ContextCommand<'_>> {
    if !line.contains(CONTEXT_MARKER) {
        return None;
    }
    if line.starts_with(CONTEXT_MARKER) {
        let caps = PUT_RE.captures(line)?;
        return Some(ContextCommand::Put {
            name: caps.get(1)?.as_str(),
            expr: caps.get(2)?.as_str(),
        });
    }
    let caps = GET_RE.captures(line)?;
    Some(ContextCommand::Get {
        target: caps.get(1)?.as_str(),
        name: caps.get(2)?.as_str(),
    })
}

/// One stored render part: what was shown, plus how it was shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub kind: OutputKind,
    pub text: String,
}

impl StoredResult {
    pub fn of(output: &RenderedOutput) -> Self {
        Self {
            kind: output.kind,
            text: output.payload.clone(),
        }
    }

    /// Rebuilds a value the engine can accept as input. Table text turns
    /// back into an all-string-column table (header line gives the names);
    /// plain text becomes a single character-sequence atom.
    pub fn to_value(&self) -> Value {
        match self.kind {
            OutputKind::Text => Value::Atom(Atom::Str(self.text.clone())),
            OutputKind::Table => {
                let mut lines = self.text.lines();
                let names: Vec<String> = lines
                    .next()
                    .map(|h| h.split('\t').map(str::to_string).collect())
                    .unwrap_or_default();
                let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
                for row in lines {
                    for (i, cell) in row.split('\t').take(names.len()).enumerate() {
                        cells[i].push(cell.to_string());
                    }
                }
                let columns = cells.into_iter().map(Column::Str).collect();
                Value::Table(Table::new(names, columns))
            }
        }
    }
}

/// In-memory name -> result store, scoped by the embedding host. The engine
/// never manages its lifecycle; it only reads and writes entries.
#[derive(Debug, Default)]
pub struct ContextStore {
    entries: HashMap<String, StoredResult>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, result: StoredResult) {
        self.entries.insert(name.into(), result);
    }

    pub fn get(&self, name: &str) -> Option<&StoredResult> {
        self.entries.get(name)
    }
}
