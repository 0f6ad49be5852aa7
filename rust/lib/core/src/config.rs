use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ServiceError;

/// Default SQLite file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "questions.db";

/// Storage and logging configuration shared by the forum binaries.
///
/// Values come from an optional TOML file and are then overridden by
/// command-line flags (see [`ServiceConfig::with_overrides`]).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/questions.db` if not specified.
    pub sqlite: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file, or defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Internal(format!("read {}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ServiceError> {
        toml::from_str(content).map_err(|e| ServiceError::Internal(format!("config: {e}")))
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        sqlite: Option<PathBuf>,
        log_filter: Option<String>,
    ) -> Self {
        if data_dir.is_some() {
            self.storage.data_dir = data_dir;
        }
        if sqlite.is_some() {
            self.storage.sqlite = sqlite;
        }
        if let Some(filter) = log_filter {
            self.log.filter = filter;
        }
        self
    }

    /// Resolve the SQLite database path, falling back to `{data_dir}/questions.db`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.sqlite {
            return path.clone();
        }
        self.storage
            .data_dir
            .as_ref()
            .map(|d| d.join(DEFAULT_DB_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }
}
