use shiptivity_core::default_log_level;
use std::env::{self, VarError};
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "SHIPTIVITY_DB_PATH";
pub const LOG_DIR_VAR: &str = "SHIPTIVITY_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "SHIPTIVITY_LOG_LEVEL";

const DEFAULT_DB_PATH: &str = "./clients.db";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Logging stays off when unset.
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let read = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
            }
        };

        Ok(Self {
            db_path: read(DB_PATH_VAR)?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_dir: read(LOG_DIR_VAR)?,
            log_level: read(LOG_LEVEL_VAR)?.unwrap_or_else(|| default_log_level().to_string()),
        })
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(
        mut self,
        db_path: Option<PathBuf>,
        log_dir: Option<String>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(log_dir) = log_dir {
            self.log_dir = Some(log_dir);
        }
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }
}
