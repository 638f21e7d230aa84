//! Notebook tool handlers: parameter decoding and result rendering.

use super::registry::{ToolError, ToolSpec};
use crate::model::cell::CellType;
use crate::search::PatternOptions;
use crate::service::notebook_service::NotebookService;
use crate::store::NotebookStore;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_CONTEXT_RADIUS: usize = 2;

pub(crate) fn notebook_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "read_notebook",
            description: "Summarize a notebook: cell count, kernel and a preview of each cell.",
            handler: read_notebook,
        },
        ToolSpec {
            name: "read_cell",
            description: "Show one cell's full source, metadata and output types.",
            handler: read_cell,
        },
        ToolSpec {
            name: "add_cell",
            description: "Insert a code or markdown cell at a position, or append it.",
            handler: add_cell,
        },
        ToolSpec {
            name: "update_cell",
            description: "Replace the source of one cell.",
            handler: update_cell,
        },
        ToolSpec {
            name: "delete_cell",
            description: "Remove one cell.",
            handler: delete_cell,
        },
        ToolSpec {
            name: "move_cell",
            description: "Move a cell from one index to another.",
            handler: move_cell,
        },
        ToolSpec {
            name: "duplicate_cell",
            description: "Copy a cell to the slot right after it, without outputs.",
            handler: duplicate_cell,
        },
        ToolSpec {
            name: "change_cell_type",
            description: "Convert a cell between code and markdown.",
            handler: change_cell_type,
        },
        ToolSpec {
            name: "update_notebook_metadata",
            description: "Set one notebook metadata key; JSON values are parsed.",
            handler: update_notebook_metadata,
        },
        ToolSpec {
            name: "update_cell_metadata",
            description: "Set one cell metadata key; JSON values are parsed.",
            handler: update_cell_metadata,
        },
        ToolSpec {
            name: "search_notebook",
            description: "Find literal or regex matches in every cell source.",
            handler: search_notebook,
        },
        ToolSpec {
            name: "replace_in_notebook",
            description: "Replace matches across cells; previews unless preview_only is false.",
            handler: replace_in_notebook,
        },
        ToolSpec {
            name: "get_cell_context",
            description: "Return a cell and its neighbours as JSON.",
            handler: get_cell_context,
        },
        ToolSpec {
            name: "extract_symbols",
            description: "List imports, variables, functions and classes in code cells.",
            handler: extract_symbols,
        },
        ToolSpec {
            name: "read_cell_output",
            description: "Render the outputs of one cell.",
            handler: read_cell_output,
        },
    ]
}

#[derive(Debug, Deserialize)]
struct PathParams {
    path: String,
}

#[derive(Debug, Deserialize)]
struct CellParams {
    path: String,
    #[serde(alias = "index")]
    cell_index: i64,
}

#[derive(Debug, Deserialize)]
struct AddCellParams {
    path: String,
    cell_type: String,
    source: String,
    #[serde(default)]
    position: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UpdateCellParams {
    path: String,
    #[serde(alias = "index")]
    cell_index: i64,
    new_source: String,
}

#[derive(Debug, Deserialize)]
struct MoveCellParams {
    path: String,
    from_index: i64,
    to_index: i64,
}

#[derive(Debug, Deserialize)]
struct ChangeTypeParams {
    path: String,
    #[serde(alias = "index")]
    cell_index: i64,
    new_type: String,
}

#[derive(Debug, Deserialize)]
struct NotebookMetadataParams {
    path: String,
    key: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
struct CellMetadataParams {
    path: String,
    #[serde(alias = "index")]
    cell_index: i64,
    key: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    path: String,
    pattern: String,
    #[serde(default)]
    use_regex: bool,
    #[serde(default = "enabled")]
    case_sensitive: bool,
}

#[derive(Debug, Deserialize)]
struct ReplaceParams {
    path: String,
    pattern: String,
    replacement: String,
    #[serde(default)]
    use_regex: bool,
    #[serde(default = "enabled")]
    case_sensitive: bool,
    #[serde(default = "enabled")]
    preview_only: bool,
}

#[derive(Debug, Deserialize)]
struct ContextParams {
    path: String,
    #[serde(alias = "index")]
    cell_index: i64,
    #[serde(default = "default_radius")]
    radius: usize,
}

fn enabled() -> bool {
    true
}

fn default_radius() -> usize {
    DEFAULT_CONTEXT_RADIUS
}

fn decode<P: DeserializeOwned>(tool: &'static str, params: Value) -> Result<P, ToolError> {
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(params).map_err(|err| ToolError::InvalidParams {
        tool,
        message: err.to_string(),
    })
}

fn cell_type_param(tool: &'static str, raw: &str) -> Result<CellType, ToolError> {
    raw.parse::<CellType>()
        .map_err(|err| ToolError::InvalidParams {
            tool,
            message: err.to_string(),
        })
}

/// Metadata values arrive as text; non-string JSON is passed on as its JSON text.
fn raw_metadata_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn service(store: &dyn NotebookStore) -> NotebookService<&dyn NotebookStore> {
    NotebookService::new(store)
}

fn read_notebook(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: PathParams = decode("read_notebook", params)?;
    Ok(service(store).read_notebook(&params.path)?.to_string())
}

fn read_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: CellParams = decode("read_cell", params)?;
    Ok(service(store)
        .read_cell(&params.path, params.cell_index)?
        .to_string())
}

fn add_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: AddCellParams = decode("add_cell", params)?;
    let cell_type = cell_type_param("add_cell", &params.cell_type)?;
    let summary =
        service(store).insert_cell(&params.path, cell_type, &params.source, params.position)?;
    Ok(summary.to_string())
}

fn update_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: UpdateCellParams = decode("update_cell", params)?;
    let summary = service(store).update_cell(&params.path, params.cell_index, &params.new_source)?;
    Ok(summary.to_string())
}

fn delete_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: CellParams = decode("delete_cell", params)?;
    Ok(service(store)
        .delete_cell(&params.path, params.cell_index)?
        .to_string())
}

fn move_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: MoveCellParams = decode("move_cell", params)?;
    let summary = service(store).move_cell(&params.path, params.from_index, params.to_index)?;
    Ok(summary.to_string())
}

fn duplicate_cell(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: CellParams = decode("duplicate_cell", params)?;
    Ok(service(store)
        .duplicate_cell(&params.path, params.cell_index)?
        .to_string())
}

fn change_cell_type(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: ChangeTypeParams = decode("change_cell_type", params)?;
    let new_type = cell_type_param("change_cell_type", &params.new_type)?;
    let summary = service(store).change_cell_type(&params.path, params.cell_index, new_type)?;
    Ok(summary.to_string())
}

fn update_notebook_metadata(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: NotebookMetadataParams = decode("update_notebook_metadata", params)?;
    let raw = raw_metadata_value(params.value);
    let summary = service(store).set_notebook_metadata(&params.path, &params.key, &raw)?;
    Ok(summary.to_string())
}

fn update_cell_metadata(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: CellMetadataParams = decode("update_cell_metadata", params)?;
    let raw = raw_metadata_value(params.value);
    let summary =
        service(store).set_cell_metadata(&params.path, params.cell_index, &params.key, &raw)?;
    Ok(summary.to_string())
}

fn search_notebook(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: SearchParams = decode("search_notebook", params)?;
    let options = PatternOptions {
        use_regex: params.use_regex,
        case_sensitive: params.case_sensitive,
    };
    let report = service(store).search(&params.path, &params.pattern, options)?;
    Ok(report.to_string())
}

fn replace_in_notebook(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: ReplaceParams = decode("replace_in_notebook", params)?;
    let options = PatternOptions {
        use_regex: params.use_regex,
        case_sensitive: params.case_sensitive,
    };
    let report = service(store).replace(
        &params.path,
        &params.pattern,
        &params.replacement,
        options,
        params.preview_only,
    )?;
    Ok(report.to_string())
}

fn get_cell_context(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: ContextParams = decode("get_cell_context", params)?;
    let bundle = service(store).cell_context(&params.path, params.cell_index, params.radius)?;
    serde_json::to_string_pretty(&bundle).map_err(ToolError::Render)
}

fn extract_symbols(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: PathParams = decode("extract_symbols", params)?;
    Ok(service(store).extract_symbols(&params.path)?.to_string())
}

fn read_cell_output(store: &dyn NotebookStore, params: Value) -> Result<String, ToolError> {
    let params: CellParams = decode("read_cell_output", params)?;
    Ok(service(store)
        .read_cell_output(&params.path, params.cell_index)?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::{decode, raw_metadata_value, ReplaceParams, SearchParams};
    use crate::tool::registry::ToolError;
    use serde_json::{json, Value};

    #[test]
    fn search_defaults_are_literal_and_case_sensitive() {
        let params: SearchParams =
            decode("search_notebook", json!({"path": "n.ipynb", "pattern": "x"})).unwrap();
        assert!(!params.use_regex);
        assert!(params.case_sensitive);
    }

    #[test]
    fn replace_defaults_to_preview() {
        let params: ReplaceParams = decode(
            "replace_in_notebook",
            json!({"path": "n.ipynb", "pattern": "a", "replacement": "b"}),
        )
        .unwrap();
        assert!(params.preview_only);
    }

    #[test]
    fn missing_fields_name_the_tool() {
        let err = decode::<SearchParams>("search_notebook", Value::Null).unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidParams { tool: "search_notebook", .. }
        ));
    }

    #[test]
    fn metadata_values_keep_string_text() {
        assert_eq!(raw_metadata_value(json!("\"title\"")), "\"title\"");
        assert_eq!(raw_metadata_value(json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(raw_metadata_value(json!(42)), "42");
    }
}
