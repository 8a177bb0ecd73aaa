//! Configuration loaded from the environment (and `.env`).

use std::path::PathBuf;

use thiserror::Error;
use vocab_core::PersistMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Storage backend for review and vocabulary state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: Backend,
    pub db_path: PathBuf,
    pub json_dir: PathBuf,
    pub persist_mode: PersistMode,
    pub algorithm: String,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration from an arbitrary variable source.
    ///
    /// Variables:
    /// - REVIEWER_BACKEND: `sqlite` (default) or `json`
    /// - REVIEWER_DB_PATH: SQLite file
    /// - REVIEWER_JSON_DIR: directory for `review.json` and `vocab.json`
    /// - REVIEWER_PERSIST_MODE: `immediate` (default) or `deferred`
    /// - REVIEWER_ALGORITHM: scheduling algorithm name (default `sm2`)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("REVIEWER_BACKEND").as_deref() {
            None | Some("sqlite") => Backend::Sqlite,
            Some("json") => Backend::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "REVIEWER_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let persist_mode = match lookup("REVIEWER_PERSIST_MODE").as_deref() {
            None | Some("immediate") => PersistMode::Immediate,
            Some("deferred") => PersistMode::Deferred,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "REVIEWER_PERSIST_MODE",
                    value: other.to_string(),
                })
            }
        };

        let data_dir = default_data_dir();
        let db_path = lookup("REVIEWER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("review.db"));
        let json_dir = lookup("REVIEWER_JSON_DIR")
            .map(PathBuf::from)
            .unwrap_or(data_dir);
        let algorithm = lookup("REVIEWER_ALGORITHM").unwrap_or_else(|| "sm2".to_string());

        Ok(Self {
            backend,
            db_path,
            json_dir,
            persist_mode,
            algorithm,
        })
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-reviewer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_sqlite_immediate() {
        let config = config(&[]).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.persist_mode, PersistMode::Immediate);
        assert_eq!(config.algorithm, "sm2");
        assert!(config.db_path.ends_with("vocab-reviewer/review.db"));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("REVIEWER_BACKEND", "json"),
            ("REVIEWER_JSON_DIR", "/tmp/words"),
            ("REVIEWER_PERSIST_MODE", "deferred"),
        ])
        .unwrap();
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.json_dir, PathBuf::from("/tmp/words"));
        assert_eq!(config.persist_mode, PersistMode::Deferred);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert_eq!(
            config(&[("REVIEWER_BACKEND", "redis")]),
            Err(ConfigError::InvalidValue {
                name: "REVIEWER_BACKEND",
                value: "redis".to_string(),
            })
        );
    }
}
