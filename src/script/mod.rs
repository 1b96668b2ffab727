//! Script runner: line splitting, context command dispatch, evaluation and
//! rendering of the last result.

use anyhow::{bail, Context, Result};
use tracing::{error, info};

use crate::config::{Config, MAX_ROWS_DEFAULT, MAX_ROWS_KEY};
use crate::context::{parse_command, ContextCommand, ContextStore, StoredResult};
use crate::engine::Connector;
use crate::render::{RenderedOutput, Renderer};

pub const CONNECTION_FAILED_MESSAGE: &str = "Connection failed.";
pub const NOTHING_TO_EXECUTE_MESSAGE: &str = "Nothing to execute!";

/// Executes q scripts against an engine session and renders the results.
/// Pure and synchronous apart from the engine calls; safe to drive from
/// multiple instances concurrently since invocations share nothing mutable.
#[derive(Debug)]
pub struct Interpreter {
    renderer: Renderer,
    max_rows: usize,
}

impl Interpreter {
    pub fn new(max_rows: usize) -> Result<Self> {
        if max_rows == 0 {
            bail!("{} must be a positive integer", MAX_ROWS_KEY);
        }
        Ok(Self {
            renderer: Renderer::new(max_rows),
            max_rows,
        })
    }

    /// Reads the row cap from the host property store. A present but
    /// unparsable value is an error, not a silent fallback.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let max_rows = match cfg.get(MAX_ROWS_KEY) {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("invalid {}: {:?}", MAX_ROWS_KEY, raw))?,
            None => MAX_ROWS_DEFAULT,
        };
        info!(max_rows, "interpreter opened");
        Self::new(max_rows)
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Runs one script: acquires a session, walks the lines, returns the
    /// rendering of the last evaluated statement. The session lives exactly
    /// as long as this call.
    pub fn execute_script(
        &self,
        script: &str,
        connector: &dyn Connector,
        ctx: &mut ContextStore,
    ) -> RenderedOutput {
        let mut engine = match connector.connect() {
            Ok(engine) => engine,
            Err(err) => {
                error!(%err, "session could not be established");
                return RenderedOutput::error(CONNECTION_FAILED_MESSAGE);
            }
        };

        let mut result: Option<RenderedOutput> = None;
        for line in script.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            if let Some(cmd) = parse_command(line) {
                match cmd {
                    ContextCommand::Put { name, expr } => {
                        info!(name, "storing result in context");
                        let value = match engine.eval(expr) {
                            Ok(value) => value,
                            Err(err) => {
                                error!(%err, "context put failed");
                                return RenderedOutput::error(err.to_string());
                            }
                        };
                        match self.renderer.render(&value) {
                            Ok(out) => {
                                ctx.put(name, StoredResult::of(&out));
                                result = Some(out);
                            }
                            Err(err) => {
                                error!(%err, "rendering failed");
                                return RenderedOutput::error(err.to_string());
                            }
                        }
                    }
                    ContextCommand::Get { target, name } => {
                        info!(name, target, "loading result from context");
                        let Some(stored) = ctx.get(name) else {
                            return RenderedOutput::error(format!(
                                "no context entry named '{}'",
                                name
                            ));
                        };
                        if let Err(err) = engine.set(target, &stored.to_value()) {
                            error!(%err, "context get failed");
                            return RenderedOutput::error(err.to_string());
                        }
                    }
                }
                continue;
            }

            // q line comment
            if line.starts_with('/') {
                continue;
            }

            info!(line, "evaluating");
            let value = match engine.eval(line) {
                Ok(value) => value,
                Err(err) => {
                    error!(%err, "evaluation failed");
                    return RenderedOutput::error(err.to_string());
                }
            };
            match self.renderer.render(&value) {
                Ok(out) => result = Some(out),
                Err(err) => {
                    error!(%err, "rendering failed");
                    return RenderedOutput::error(err.to_string());
                }
            }
        }

        result.unwrap_or_else(|| RenderedOutput::error(NOTHING_TO_EXECUTE_MESSAGE))
    }
}
