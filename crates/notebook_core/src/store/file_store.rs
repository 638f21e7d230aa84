//! nbformat v4 JSON files on the local filesystem.
//!
//! # Invariants
//! - Saves go through a temporary file in the target directory and are
//!   renamed into place; readers never see a partial write.
//! - Symlinked paths are resolved first and existing permissions are copied
//!   onto the replacement file.
//! - Output uses one-space indentation and a trailing newline, as Jupyter
//!   writes notebooks.

use super::{NotebookStore, StoreError, StoreResult};
use crate::model::notebook::Notebook;
use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

const JSON_INDENT: &[u8] = b" ";

/// Filesystem-backed store; `path` is a file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNotebookStore;

impl FileNotebookStore {
    pub fn new() -> Self {
        Self
    }
}

impl NotebookStore for FileNotebookStore {
    fn load(&self, path: &str) -> StoreResult<Notebook> {
        let started_at = Instant::now();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            error!(
                "event=notebook_load module=store status=error path={} error={}",
                path, err
            );
            if err.kind() == ErrorKind::NotFound {
                StoreError::NotFound(path.to_string())
            } else {
                StoreError::Io {
                    path: path.to_string(),
                    source: err,
                }
            }
        })?;

        let notebook: Notebook =
            serde_json::from_str(&raw).map_err(|err| StoreError::Malformed {
                path: path.to_string(),
                source: err,
            })?;

        info!(
            "event=notebook_load module=store status=ok path={} cells={} duration_ms={}",
            path,
            notebook.len(),
            started_at.elapsed().as_millis()
        );
        Ok(notebook)
    }

    fn save(&self, notebook: &Notebook, path: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded = encode_notebook(notebook).map_err(|err| StoreError::Serialize {
            path: path.to_string(),
            source: err,
        })?;

        let io_error = |source: std::io::Error| StoreError::Io {
            path: path.to_string(),
            source,
        };
        let target = resolve_target(Path::new(path)).map_err(io_error)?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let existing_permissions = match std::fs::metadata(&target) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(io_error(err)),
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;
        staged.write_all(&encoded).map_err(io_error)?;
        if let Some(permissions) = existing_permissions {
            staged
                .as_file()
                .set_permissions(permissions)
                .map_err(io_error)?;
        }
        staged.as_file().sync_all().map_err(io_error)?;
        staged.persist(&target).map_err(|err| {
            error!(
                "event=notebook_save module=store status=error path={} error={}",
                path, err.error
            );
            io_error(err.error)
        })?;

        info!(
            "event=notebook_save module=store status=ok path={} cells={} bytes={} duration_ms={}",
            path,
            notebook.len(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Follows symlinks so the rename replaces the real file, not the link.
/// A path that does not exist yet is used as given.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(err),
    }
}

fn encode_notebook(notebook: &Notebook) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    notebook.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}
