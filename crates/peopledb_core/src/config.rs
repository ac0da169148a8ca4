//! Runtime settings: where the store lives and how logging is set up.
//!
//! # Invariants
//! - Settings are normalized once here; downstream code trusts them.
//! - Logging stays off unless a log directory is configured.

use crate::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const IN_MEMORY_MARKER: &str = ":memory:";

/// Store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Blank input and `:memory:` select a private in-memory database.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | IN_MEMORY_MARKER => Self::InMemory,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

/// Validated input for [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub dir: PathBuf,
}

impl LogSettings {
    /// # Errors
    /// - `level` is not one of `trace|debug|info|warn|error`.
    /// - `dir` is blank or relative.
    pub fn new(level: &str, dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            dir: normalize_log_dir(dir)?,
        })
    }
}

/// Everything a front end needs to open the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: DatabaseLocation,
    pub log: Option<LogSettings>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            log: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config from raw front-end inputs.
    ///
    /// A missing `log_level` falls back to [`default_log_level`]; it is still
    /// validated when given without a `log_dir`.
    pub fn from_inputs(
        database: Option<&str>,
        log_level: Option<&str>,
        log_dir: Option<&str>,
    ) -> Result<Self, String> {
        let level = match log_level {
            Some(level) => normalize_level(level)?,
            None => default_log_level(),
        };
        let log = log_dir
            .map(|dir| LogSettings::new(level, dir))
            .transpose()?;

        Ok(Self {
            database: database.map_or(DatabaseLocation::InMemory, DatabaseLocation::parse),
            log,
        })
    }

    /// Opens the configured database with its schema applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.database {
            DatabaseLocation::InMemory => open_db_in_memory(),
            DatabaseLocation::File(path) => open_db(path),
        }
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

pub(crate) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}
