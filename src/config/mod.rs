//! Configuration handling for the application.
//!
//! `Config::from_env` reads environment variables and falls back to
//! development defaults, so the server starts with no setup at all.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extractor::source::DEFAULT_ALLOWED_HOST;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_LEXICON_PATH: &str = "LEXICON_PATH";
pub const ENV_EXTRACT_ALLOWED_HOST: &str = "EXTRACT_ALLOWED_HOST";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    lexicon_path: Option<PathBuf>,
    allowed_host: String,
    fetch_timeout: Duration,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            lexicon_path: None,
            allowed_host: DEFAULT_ALLOWED_HOST.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = read_var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr);
        let lexicon_path = read_var(ENV_LEXICON_PATH).map(PathBuf::from);
        let allowed_host = read_var(ENV_EXTRACT_ALLOWED_HOST).unwrap_or(defaults.allowed_host);

        let fetch_timeout = match read_var(ENV_FETCH_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.fetch_timeout,
        };

        let log_format = match read_var(ENV_LOG_FORMAT) {
            Some(raw) => parse_log_format(&raw)?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind_addr,
            lexicon_path,
            allowed_host,
            fetch_timeout,
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Optional TOML lexicon replacing the embedded one.
    pub fn lexicon_path(&self) -> Option<&Path> {
        self.lexicon_path.as_deref()
    }
    /// The only host the extractor will fetch from.
    pub fn allowed_host(&self) -> &str {
        &self.allowed_host
    }
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            field: ENV_FETCH_TIMEOUT_SECS,
            reason: format!("expected a positive number of seconds, got '{}'", raw),
        }),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidValue {
            field: ENV_LOG_FORMAT,
            reason: format!("expected 'text' or 'json', got '{}'", raw),
        }),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
