use notebook_core::{
    CellType, FileNotebookStore, NotebookError, NotebookService, NotebookStore, StoreError,
};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, document: &Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn fixture() -> Value {
    json!({
        "cells": [
            {
                "cell_type": "code",
                "id": "0a1b2c3d",
                "metadata": {"scrolled": true},
                "source": ["import pandas as pd\n", "df = pd.read_csv('x.csv')"],
                "execution_count": 1,
                "outputs": [
                    {
                        "output_type": "display_data",
                        "data": {"image/png": "iVBOR", "text/plain": ["<Figure>"]},
                        "metadata": {"needs_background": "light"}
                    }
                ]
            },
            {"cell_type": "markdown", "id": "4e5f6a7b", "metadata": {}, "source": "Notes"}
        ],
        "metadata": {
            "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"},
            "language_info": {"name": "python", "version": "3.11.4"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

#[test]
fn edit_round_trip_keeps_unknown_fields_and_line_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "analysis.ipynb", &fixture());
    let service = NotebookService::new(FileNotebookStore::new());

    service
        .insert_cell(&path, CellType::Markdown, "# Summary\nshort", None)
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.ends_with('\n'));
    assert!(raw.starts_with("{\n \""));

    let saved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["metadata"]["language_info"]["version"], "3.11.4");
    assert_eq!(
        saved["cells"][0]["outputs"][0]["metadata"],
        json!({"needs_background": "light"})
    );
    assert_eq!(saved["cells"][0]["id"], "0a1b2c3d");
    assert_eq!(saved["cells"][2]["source"], json!(["# Summary\n", "short"]));
    assert_eq!(saved["cells"][2]["cell_type"], "markdown");
}

#[test]
fn save_replaces_the_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "clean.ipynb", &fixture());
    let store = FileNotebookStore::new();

    let mut notebook = store.load(&path).unwrap();
    notebook.cells.truncate(1);
    store.save(&notebook, &path).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("clean.ipynb")]);
    assert_eq!(store.load(&path).unwrap().len(), 1);
}

#[test]
fn missing_and_malformed_files_map_to_store_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNotebookStore::new();

    let missing = dir.path().join("absent.ipynb");
    assert!(matches!(
        store.load(missing.to_str().unwrap()),
        Err(StoreError::NotFound(_))
    ));

    let broken = dir.path().join("broken.ipynb");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        store.load(broken.to_str().unwrap()),
        Err(StoreError::Malformed { .. })
    ));

    let wrong_shape = write_fixture(&dir, "shape.ipynb", &json!({"cells": "nope"}));
    assert!(matches!(
        store.load(&wrong_shape),
        Err(StoreError::Malformed { .. })
    ));
}

#[test]
fn rejected_edit_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "guarded.ipynb", &fixture());
    let before = std::fs::read_to_string(&path).unwrap();
    let service = NotebookService::new(FileNotebookStore::new());

    let err = service.delete_cell(&path, 2).unwrap_err();
    assert!(matches!(err, NotebookError::Index(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn read_views_use_the_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "report.ipynb", &fixture());
    let service = NotebookService::new(FileNotebookStore::new());

    let overview = service.read_notebook(&path).unwrap();
    assert_eq!(overview.name, "report.ipynb");
    assert_eq!(overview.kernel.as_deref(), Some("Python 3"));

    let outputs = service.read_cell_output(&path, 0).unwrap();
    assert_eq!(outputs.outputs[0].header, "display_data");
    assert_eq!(outputs.outputs[0].body, "<Figure>");
    assert!(Path::new(&path).exists());
}

#[cfg(unix)]
#[test]
fn save_keeps_existing_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "shared.ipynb", &fixture());
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
    let service = NotebookService::new(FileNotebookStore::new());

    service
        .insert_cell(&path, CellType::Code, "print(1)", None)
        .unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[cfg(unix)]
#[test]
fn save_through_symlink_updates_the_linked_file() {
    let dir = tempfile::tempdir().unwrap();
    let real = write_fixture(&dir, "real.ipynb", &fixture());
    let link = dir.path().join("link.ipynb");
    std::os::unix::fs::symlink(&real, &link).unwrap();
    let link = link.to_str().unwrap().to_string();
    let service = NotebookService::new(FileNotebookStore::new());

    service
        .insert_cell(&link, CellType::Markdown, "via link", None)
        .unwrap();

    let link_metadata = std::fs::symlink_metadata(&link).unwrap();
    assert!(link_metadata.file_type().is_symlink());
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&real).unwrap()).unwrap();
    assert_eq!(saved["cells"].as_array().unwrap().len(), 3);
    assert_eq!(saved["cells"][2]["source"], json!(["via link"]));
}
