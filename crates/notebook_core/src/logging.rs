//! Rolling file logs for notebook processes.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend at most once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Initialization is idempotent for an identical level and directory.
//! - Switching level or directory after start is rejected.
//! - Initialization never panics.
//! - Without initialization the `log` macros are no-ops.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "notebook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 200;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    InvalidDirectory { dir: String, reason: String },
    Backend(String),
    /// Logging already runs with a different `setting`.
    Conflict {
        setting: &'static str,
        active: String,
        requested: String,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory { dir, reason } => {
                write!(f, "invalid log directory `{dir}`: {reason}")
            }
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict {
                setting,
                active,
                requested,
            } => write!(
                f,
                "logging already running with {setting} `{active}`; refusing to switch to `{requested}`"
            ),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `log_dir` with `level`.
///
/// # Errors
/// - `InvalidLevel` for anything outside trace|debug|info|warn|error.
/// - `InvalidDirectory` when `log_dir` is blank, relative or cannot be created.
/// - `Backend` when `flexi_logger` refuses to start.
/// - `Conflict` when logging already runs with other settings.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let dir = parse_log_dir(log_dir)?;

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, &dir))?;
    ensure_same_settings(active, level, &dir)
}

/// Starts logging from resolved config; returns `false` when no directory is set.
pub fn init_from_config(config: &CoreConfig) -> Result<bool, LoggingError> {
    let Some(dir) = &config.log_dir else {
        return Ok(false);
    };
    init_logging(&config.log_level, &dir.to_string_lossy())?;
    Ok(true)
}

/// Returns `(level, log_dir)` of the running logger.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|err| LoggingError::InvalidDirectory {
        dir: dir.display().to_string(),
        reason: err.to_string(),
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();

    info!(
        "event=logging_start module=logging status=ok level={} log_dir={} version={} platform={}",
        level,
        dir.display(),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same_settings(
    active: &ActiveLogger,
    level: &'static str,
    dir: &Path,
) -> Result<(), LoggingError> {
    if active.dir != dir {
        return Err(LoggingError::Conflict {
            setting: "directory",
            active: active.dir.display().to_string(),
            requested: dir.display().to_string(),
        });
    }
    if active.level != level {
        return Err(LoggingError::Conflict {
            setting: "level",
            active: active.level.to_string(),
            requested: level.to_string(),
        });
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::InvalidLevel(other.to_string())),
    }
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    let invalid = |reason: &str| LoggingError::InvalidDirectory {
        dir: trimmed.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(invalid("path must be absolute"));
    }
    Ok(path)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            single_line(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

/// Collapses line breaks and caps the length of a log field.
fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut capped: String = flattened.chars().take(max_chars).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{init_from_config, init_logging, logging_status, parse_level, parse_log_dir};
    use super::{single_line, LoggingError};
    use crate::config::CoreConfig;

    #[test]
    fn parse_level_normalizes_case_and_aliases() {
        assert_eq!(parse_level(" WARNING ").unwrap(), "warn");
        assert_eq!(parse_level("Info").unwrap(), "info");
        assert!(matches!(
            parse_level("verbose"),
            Err(LoggingError::InvalidLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn parse_log_dir_rejects_blank_and_relative_paths() {
        assert!(matches!(
            parse_log_dir("  "),
            Err(LoggingError::InvalidDirectory { .. })
        ));
        let err = parse_log_dir("logs/dev").unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        assert_eq!(single_line("a\nb\rc", 10), "a b c");
        assert_eq!(single_line("abcdefgh", 3), "abc...");
    }

    #[test]
    fn config_without_directory_leaves_logging_off() {
        let config = CoreConfig::default();
        assert!(!init_from_config(&config).unwrap());
    }

    #[test]
    fn init_is_idempotent_and_rejects_switching() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let first_dir = first.path().to_str().unwrap().to_string();
        let second_dir = second.path().to_str().unwrap().to_string();

        init_logging("info", &first_dir).unwrap();
        init_logging(" INFO ", &first_dir).unwrap();

        let level_err = init_logging("debug", &first_dir).unwrap_err();
        assert!(matches!(
            level_err,
            LoggingError::Conflict { setting: "level", .. }
        ));
        let dir_err = init_logging("info", &second_dir).unwrap_err();
        assert!(dir_err.to_string().contains("refusing to switch"));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
