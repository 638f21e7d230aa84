//! Named tool table and invocation envelope.

use crate::service::notebook_service::NotebookError;
use crate::store::NotebookStore;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Uniform response returned for every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    /// Whether the tool ran and reported success.
    pub ok: bool,
    /// Human-readable result or failure message.
    pub content: String,
}

impl ToolResponse {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            ok: true,
            content: content.into(),
        }
    }

    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            ok: false,
            content: content.into(),
        }
    }
}

/// Tool dispatch failure.
#[derive(Debug)]
pub enum ToolError {
    UnknownTool(String),
    InvalidParams { tool: &'static str, message: String },
    Operation(NotebookError),
    /// Result could not be rendered as JSON.
    Render(serde_json::Error),
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "unknown tool `{name}`"),
            Self::InvalidParams { tool, message } => {
                write!(f, "invalid parameters for `{tool}`: {message}")
            }
            Self::Operation(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render result: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Operation(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::UnknownTool(_) | Self::InvalidParams { .. } => None,
        }
    }
}

impl From<NotebookError> for ToolError {
    fn from(value: NotebookError) -> Self {
        Self::Operation(value)
    }
}

/// Handler signature: decoded against the store, returns display text.
pub type ToolHandler = fn(&dyn NotebookStore, Value) -> Result<String, ToolError>;

/// One registered tool.
#[derive(Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: ToolHandler,
}

/// Explicit name-to-handler table, built once and passed by reference.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every notebook tool.
    pub fn with_notebook_tools() -> Self {
        let mut registry = Self::new();
        for spec in super::handlers::notebook_tools() {
            registry.register(spec);
        }
        registry
    }

    /// Registers `spec`, returning any tool it replaced.
    pub fn register(&mut self, spec: ToolSpec) -> Option<ToolSpec> {
        self.tools.insert(spec.name, spec)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tools sorted by name.
    pub fn tools(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name.trim())
    }

    /// Runs `name` with `params`; every failure becomes `ok = false`.
    pub fn invoke(&self, store: &dyn NotebookStore, name: &str, params: Value) -> ToolResponse {
        let started_at = Instant::now();
        let outcome = match self.get(name) {
            Some(spec) => (spec.handler)(store, params),
            None => Err(ToolError::UnknownTool(name.trim().to_string())),
        };

        match outcome {
            Ok(content) => {
                info!(
                    "event=tool_call module=tool status=ok tool={} duration_ms={}",
                    name.trim(),
                    started_at.elapsed().as_millis()
                );
                ToolResponse::success(content)
            }
            Err(err) => {
                warn!(
                    "event=tool_call module=tool status=error tool={} error={}",
                    name.trim(),
                    err
                );
                ToolResponse::failure(format!("Error: {err}"))
            }
        }
    }
}
