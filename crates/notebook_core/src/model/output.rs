//! Execution output records attached to code cells.
//!
//! # Invariants
//! - Outputs are never mutated by core operations; they are only read or
//!   dropped wholesale.
//! - Keys this model does not name (for example `transient`) survive a
//!   load/save round trip through the `extra` maps.

use super::multiline;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One output record, tagged on disk by `output_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream(StreamOutput),
    ExecuteResult(ExecuteResultOutput),
    DisplayData(DisplayDataOutput),
    Error(ErrorOutput),
}

impl Output {
    /// Stable `output_type` name used in reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::ExecuteResult(_) => "execute_result",
            Self::DisplayData(_) => "display_data",
            Self::Error(_) => "error",
        }
    }

    /// Returns the MIME bundle for rich outputs.
    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::ExecuteResult(result) => Some(&result.data),
            Self::DisplayData(display) => Some(&display.data),
            Self::Stream(_) | Self::Error(_) => None,
        }
    }

    /// Returns the `text/plain` entry of a rich output, list entries joined.
    pub fn plain_text(&self) -> Option<String> {
        self.data()?
            .get("text/plain")
            .and_then(multiline::text_from_value)
    }
}

/// `stream` output: text written to stdout or stderr.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// `stdout` or `stderr`.
    pub name: String,
    #[serde(with = "multiline")]
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `execute_result` output: the value of the last expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResultOutput {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub execution_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `display_data` output: rich data pushed by a display call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayDataOutput {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `error` output: an exception raised while executing the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub ename: String,
    pub evalue: String,
    /// Traceback lines; may contain terminal color sequences.
    #[serde(default)]
    pub traceback: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Output {
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Stream(StreamOutput {
            name: name.into(),
            text: text.into(),
            extra: Map::new(),
        })
    }

    pub fn execute_result(data: Map<String, Value>, execution_count: Option<i64>) -> Self {
        Self::ExecuteResult(ExecuteResultOutput {
            data,
            metadata: Map::new(),
            execution_count,
            extra: Map::new(),
        })
    }

    pub fn display_data(data: Map<String, Value>) -> Self {
        Self::DisplayData(DisplayDataOutput {
            data,
            metadata: Map::new(),
            extra: Map::new(),
        })
    }

    pub fn error(
        ename: impl Into<String>,
        evalue: impl Into<String>,
        traceback: Vec<String>,
    ) -> Self {
        Self::Error(ErrorOutput {
            ename: ename.into(),
            evalue: evalue.into(),
            traceback,
            extra: Map::new(),
        })
    }
}
