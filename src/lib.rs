//! qbridge: runs q scripts against a kdb+-style columnar engine and renders
//! the heterogeneous results (atoms, lists, dictionaries, tables) into
//! row-limited display text.
//!
//! The wire protocol is out of scope; hosts plug a transport in behind
//! [`engine::Connector`] and [`engine::QueryEngine`].

pub mod config;
pub mod context;
pub mod engine;
pub mod render;
pub mod script;
pub mod value;

pub use config::Config;
pub use context::ContextStore;
pub use engine::{Connector, EngineError, QueryEngine};
pub use render::{OutputKind, RenderedOutput, Renderer, Status};
pub use script::Interpreter;
pub use value::{Atom, Column, Table, Value};
