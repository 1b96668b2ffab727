//! Result serialization engine: classifies a raw engine value and renders it
//! into row-limited display text.

mod dict;
mod limit;
mod list;
mod table;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

pub use limit::RowLimit;

pub(crate) const NEWLINE: char = '\n';
pub(crate) const TAB: char = '\t';

/// Fixed payload for a null result.
pub const NO_DATA_MESSAGE: &str = "Query executed successfully, no data returned.";

/// Rendering failed outright. Unlike truncation, no partial output is
/// returned for these.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed table: {0}")]
    MalformedTable(String),
    #[error("malformed dictionary: {0}")]
    MalformedDict(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// How the presentation layer should treat the payload: raw text, or a
/// tab-separated grid whose first line is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    Text,
    Table,
}

/// Final envelope for one render. When the row cap was hit, `notice` holds a
/// text part ordered before the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOutput {
    pub status: Status,
    pub kind: OutputKind,
    pub notice: Option<String>,
    pub payload: String,
}

impl RenderedOutput {
    pub fn error(payload: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            kind: OutputKind::Text,
            notice: None,
            payload: payload.into(),
        }
    }

    pub fn text(payload: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            kind: OutputKind::Text,
            notice: None,
            payload: payload.into(),
        }
    }

    pub fn truncated(&self) -> bool {
        self.notice.is_some()
    }
}

/// Classifier over the value variants; dispatches to the matching renderer
/// with a fresh [`RowLimit`] per invocation.
#[derive(Debug, Clone)]
pub struct Renderer {
    max_rows: usize,
}

impl Renderer {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    pub fn render(&self, value: &Value) -> Result<RenderedOutput, RenderError> {
        match value {
            Value::Error(msg) => Ok(RenderedOutput::error(msg.clone())),
            Value::Null => Ok(RenderedOutput::text(NO_DATA_MESSAGE)),
            Value::Atom(atom) => Ok(RenderedOutput::text(atom.to_string())),
            Value::List(items) => {
                let mut limit = RowLimit::new(self.max_rows);
                let text = list::render(items, &mut limit);
                Ok(self.finish(OutputKind::Text, text, &limit))
            }
            Value::Dict(keys, values) => {
                let mut limit = RowLimit::new(self.max_rows);
                let text = dict::render(keys, values, &mut limit)?;
                Ok(self.finish(OutputKind::Table, text, &limit))
            }
            Value::Table(t) => {
                let mut limit = RowLimit::new(self.max_rows);
                let text = table::render(t, &mut limit)?;
                Ok(self.finish(OutputKind::Table, text, &limit))
            }
        }
    }

    fn finish(&self, kind: OutputKind, payload: String, limit: &RowLimit) -> RenderedOutput {
        let notice = limit
            .exceeded()
            .then(|| format!("Shows only {} rows", limit.max_rows()));
        RenderedOutput {
            status: Status::Success,
            kind,
            notice,
            payload,
        }
    }
}
