use notebook_core::inspect::symbols::Symbol;
use notebook_core::{
    Cell, IndexKind, MemoryNotebookStore, Notebook, NotebookError, NotebookService, Output,
};
use serde_json::Value;

const PATH: &str = "/projects/ctx.ipynb";

fn service_with(cells: Vec<Cell>) -> NotebookService<MemoryNotebookStore> {
    let store = MemoryNotebookStore::new();
    store.insert(PATH, Notebook::with_cells(cells));
    NotebookService::new(store)
}

fn five_cells() -> NotebookService<MemoryNotebookStore> {
    let mut first = Cell::code("x = 1");
    if let Cell::Code(code) = &mut first {
        code.execution_count = Some(1);
        code.outputs = vec![
            Output::stream("stdout", "ok\n"),
            Output::error("ValueError", "bad", vec!["trace".to_string()]),
        ];
    }
    service_with(vec![
        first,
        Cell::markdown("## Step"),
        Cell::code("y = x + 1"),
        Cell::code("print(y)"),
        Cell::markdown("done"),
    ])
}

fn indices(
    service: &NotebookService<MemoryNotebookStore>,
    target: i64,
    radius: usize,
) -> Vec<usize> {
    service
        .cell_context(PATH, target, radius)
        .unwrap()
        .cells
        .iter()
        .map(|cell| cell.index)
        .collect()
}

fn texts(symbols: &[Symbol]) -> Vec<&str> {
    symbols.iter().map(|symbol| symbol.text.as_str()).collect()
}

#[test]
fn context_window_is_clipped_to_document_bounds() {
    let service = five_cells();
    assert_eq!(indices(&service, 2, 1), vec![1, 2, 3]);
    assert_eq!(indices(&service, 0, 2), vec![0, 1, 2]);
    assert_eq!(indices(&service, 4, 2), vec![2, 3, 4]);
    assert_eq!(indices(&service, 3, 0), vec![3]);
    assert_eq!(indices(&service, 2, 10), vec![0, 1, 2, 3, 4]);
}

#[test]
fn context_marks_target_and_summarizes_code_outputs() {
    let service = five_cells();
    let bundle = service.cell_context(PATH, 1, 1).unwrap();

    assert_eq!(bundle.notebook, "ctx.ipynb");
    assert_eq!(bundle.total_cells, 5);
    assert_eq!((bundle.range.start, bundle.range.end), (0, 3));
    let targets: Vec<bool> = bundle.cells.iter().map(|cell| cell.is_target).collect();
    assert_eq!(targets, vec![false, true, false]);

    let rendered: Value = serde_json::to_value(&bundle).unwrap();
    let first = &rendered["cells"][0];
    assert_eq!(first["cell_type"], "code");
    assert_eq!(first["execution_count"], 1);
    assert_eq!(first["outputs"][0]["output_type"], "stream");
    assert_eq!(first["outputs"][1]["ename"], "ValueError");

    let markdown = &rendered["cells"][1];
    assert!(markdown.get("outputs").is_none());
    assert_eq!(markdown["source"], "## Step");
}

#[test]
fn context_rejects_missing_target() {
    let service = five_cells();
    match service.cell_context(PATH, 5, 2) {
        Err(NotebookError::Index(err)) => assert_eq!(err.kind, IndexKind::Cell),
        other => panic!("expected index error, got {other:?}"),
    }
}

#[test]
fn symbols_fixture_reports_each_kind() {
    let service = service_with(vec![
        Cell::markdown("import ignored\nclass Ignored:"),
        Cell::code("import os\n\ndef foo():\n    pass\n\nclass Bar:\n    pass\n\nx = 1\n_y = 2"),
    ]);
    let report = service.extract_symbols(PATH).unwrap();

    assert_eq!(texts(&report.imports), vec!["import os"]);
    assert_eq!(texts(&report.functions), vec!["foo"]);
    assert_eq!(texts(&report.classes), vec!["Bar"]);
    assert_eq!(texts(&report.variables), vec!["x"]);
    assert!(report.imports.iter().all(|symbol| symbol.cell_index == 1));

    let rendered = report.to_string();
    assert!(rendered.contains("Imports (1):\n  [cell 1] import os"));
    assert!(rendered.contains("Classes (1):\n  [cell 1] Bar"));
    assert_eq!(service.store().save_count(), 0);
}

#[test]
fn read_cell_output_renders_records_and_empty_notice() {
    let service = five_cells();

    let outputs = service.read_cell_output(PATH, 0).unwrap();
    assert_eq!(outputs.outputs.len(), 2);
    assert_eq!(outputs.outputs[0].header, "stream (stdout)");
    assert_eq!(outputs.outputs[1].body, "ValueError: bad\ntrace");

    let none = service.read_cell_output(PATH, 1).unwrap();
    assert_eq!(none.to_string(), "Cell #1 has no output.");
}
