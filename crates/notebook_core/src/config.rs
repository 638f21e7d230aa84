//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Read logging settings from `NOTEBOOK_LOG_LEVEL` and `NOTEBOOK_LOG_DIR`.
//! - Let transport layers layer explicit overrides on top.
//!
//! # Invariants
//! - Values are trimmed; an empty value counts as unset.
//! - An unset log directory disables file logging.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const LOG_LEVEL_ENV: &str = "NOTEBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "NOTEBOOK_LOG_DIR";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = non_empty(lookup(LOG_LEVEL_ENV)) {
            config.log_level = level;
        }
        config.log_dir = non_empty(lookup(LOG_DIR_ENV)).map(PathBuf::from);
        config
    }

    /// Applies explicit values; `None` keeps the resolved setting.
    pub fn with_overrides(mut self, log_level: Option<String>, log_dir: Option<String>) -> Self {
        if let Some(level) = non_empty(log_level) {
            self.log_level = level;
        }
        if let Some(dir) = non_empty(log_dir) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
