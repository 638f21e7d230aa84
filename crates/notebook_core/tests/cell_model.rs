use notebook_core::{Cell, CellType, Notebook, Output};
use serde_json::{json, Value};

fn sample_document() -> Value {
    json!({
        "cells": [
            {
                "cell_type": "markdown",
                "id": "a1b2c3d4",
                "metadata": {},
                "source": ["# Title\n", "intro"],
                "attachments": {"img.png": {"image/png": "iVBOR"}}
            },
            {
                "cell_type": "code",
                "id": "e5f6a7b8",
                "metadata": {"tags": ["setup"]},
                "source": "import os\nx = 1",
                "execution_count": 3,
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": ["hello\n", "world\n"]},
                    {
                        "output_type": "execute_result",
                        "execution_count": 3,
                        "data": {"text/plain": ["1"]},
                        "metadata": {}
                    }
                ]
            }
        ],
        "metadata": {
            "kernelspec": {"name": "python3", "display_name": "Python 3"},
            "custom": {"owner": "lab"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

#[test]
fn decodes_cells_outputs_and_multiline_sources() {
    let notebook: Notebook = serde_json::from_value(sample_document()).unwrap();

    assert_eq!(notebook.len(), 2);
    assert_eq!(notebook.cells[0].cell_type(), CellType::Markdown);
    assert_eq!(notebook.cells[0].source(), "# Title\nintro");
    assert_eq!(notebook.cells[1].source(), "import os\nx = 1");
    assert_eq!(notebook.cells[1].execution_count(), Some(3));
    assert_eq!(notebook.kernel_display_name(), Some("Python 3"));

    let outputs = notebook.cells[1].outputs();
    assert_eq!(outputs.len(), 2);
    match &outputs[0] {
        Output::Stream(stream) => assert_eq!(stream.text, "hello\nworld\n"),
        other => panic!("unexpected output: {other:?}"),
    }
    assert_eq!(outputs[1].plain_text().as_deref(), Some("1"));
}

#[test]
fn encoding_preserves_unknown_fields_and_splits_sources() {
    let notebook: Notebook = serde_json::from_value(sample_document()).unwrap();
    let encoded = serde_json::to_value(&notebook).unwrap();

    assert_eq!(
        encoded["cells"][0]["attachments"],
        json!({"img.png": {"image/png": "iVBOR"}})
    );
    assert_eq!(encoded["cells"][0]["id"], "a1b2c3d4");
    assert_eq!(encoded["cells"][1]["source"], json!(["import os\n", "x = 1"]));
    assert_eq!(encoded["metadata"]["custom"], json!({"owner": "lab"}));
    assert_eq!(encoded["nbformat_minor"], 5);

    let reparsed: Notebook = serde_json::from_value(encoded).unwrap();
    assert_eq!(reparsed, notebook);
}

#[test]
fn unsupported_cell_type_is_rejected() {
    let raw = json!({
        "cells": [{"cell_type": "raw", "metadata": {}, "source": ""}],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    });
    assert!(serde_json::from_value::<Notebook>(raw).is_err());
}

#[test]
fn markdown_cells_expose_no_outputs() {
    let cell = Cell::markdown("text");
    assert!(cell.outputs().is_empty());
    assert_eq!(cell.execution_count(), None);
    assert_eq!("markdown".parse::<CellType>().unwrap(), CellType::Markdown);
    assert!("Markdown".parse::<CellType>().is_err());
    assert!("raw".parse::<CellType>().is_err());
}
