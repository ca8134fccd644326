//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DB`: Path to the SQLite database (defaults to ~/.local/share/daybook/daybook.db)
//! - `DAYBOOK_USER`: Owner id for diary operations
//! - `USER`: Fallback owner id if DAYBOOK_USER is not set (defaults to "default")
//! - `DAYBOOK_LOG_FORMAT`: `text` or `json` (defaults to text)
//! - `DAYBOOK_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset (defaults to info)

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_LOG_LEVEL, DEFAULT_OWNER_ID, ENV_VAR_DAYBOOK_DB,
    ENV_VAR_DAYBOOK_LOG_FORMAT, ENV_VAR_DAYBOOK_LOG_LEVEL, ENV_VAR_DAYBOOK_USER, ENV_VAR_USER,
    LOG_FORMAT_JSON, LOG_FORMAT_TEXT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for log lines written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            LOG_FORMAT_TEXT => Ok(LogFormat::Text),
            LOG_FORMAT_JSON => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}'; expected '{}' or '{}'",
                other, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            ))),
        }
    }
}

/// Configuration for the daybook application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/daybook.db"),
///     owner_id: "alice".to_string(),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Location of the SQLite database file.
    ///
    /// Loaded from `DAYBOOK_DB` with `~` and `$VARS` expanded.
    pub db_path: PathBuf,

    /// Owner id diary operations are scoped to.
    ///
    /// This is loaded from environment variables in the following order of precedence:
    /// 1. DAYBOOK_USER
    /// 2. USER
    /// 3. Defaults to "default" if neither is set
    pub owner_id: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Default tracing filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &REDACTED_PLACEHOLDER)
            .field("owner_id", &self.owner_id)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(""),
            owner_id: DEFAULT_OWNER_ID.to_string(),
            log_format: LogFormat::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails
    /// - `DAYBOOK_LOG_FORMAT` names an unknown format
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daybook::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Writing as {}", config.owner_id),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let db_path_raw =
            env::var(ENV_VAR_DAYBOOK_DB).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        // Expand the path (handles ~ and environment variables)
        let expanded_path = shellexpand::full(&db_path_raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let owner_id = env::var(ENV_VAR_DAYBOOK_USER)
            .or_else(|_| env::var(ENV_VAR_USER))
            .ok()
            .filter(|user| !user.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER_ID.to_string());

        let log_format = match env::var(ENV_VAR_DAYBOOK_LOG_FORMAT) {
            Ok(raw) => raw.parse()?,
            Err(_) => LogFormat::default(),
        };

        let log_level = env::var(ENV_VAR_DAYBOOK_LOG_LEVEL)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            db_path: PathBuf::from(expanded_path.into_owned()),
            owner_id,
            log_format,
            log_level,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty" if the database path is empty
    /// - "Owner id is empty" if the owner id is blank
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if self.owner_id.trim().is_empty() {
            return Err(AppError::Config("Owner id is empty".to_string()));
        }

        Ok(())
    }

    /// Creates the directory holding the database file if it doesn't exist.
    pub fn ensure_db_dir(&self) -> AppResult<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
