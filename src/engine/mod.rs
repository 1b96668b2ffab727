//! Boundary traits for the columnar query engine.
//!
//! The bridge never speaks the wire protocol itself; a host supplies a
//! [`Connector`] and the session it opens. One session is acquired per script
//! execution and dropped when the script finishes.

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Session could not be established.
    #[error("connection failed: {0}")]
    Connection(String),
    /// Transport or evaluation fault after the session was up.
    #[error("{0}")]
    Eval(String),
}

/// An open session against the engine.
///
/// Backend-side failures (a q error result) are not `Err` here: they come
/// back as `Ok(Value::Error(..))`, since the engine delivered a value.
pub trait QueryEngine {
    /// Evaluates one expression and returns its raw result.
    fn eval(&mut self, expr: &str) -> Result<Value, EngineError>;

    /// Binds `value` to `name` on the engine side, for results pulled back
    /// out of the shared context.
    fn set(&mut self, name: &str, value: &Value) -> Result<(), EngineError>;
}

/// Session factory. Connecting and dropping happens once per script run.
pub trait Connector {
    fn connect(&self) -> Result<Box<dyn QueryEngine>, EngineError>;
}
