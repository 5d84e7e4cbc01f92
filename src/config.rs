use crate::core::{DbViewError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// Top-level configuration structure parsed from a TOML file.
///
/// Configuration is only ever read, from a file named explicitly on the
/// command line. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub sqlite: SqliteConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: Option<String>,
}

impl LogConfig {
    /// Maximum tracing level, `INFO` when unset
    pub fn max_level(&self) -> Result<Level> {
        match &self.level {
            None => Ok(Level::INFO),
            Some(level) => Level::from_str(level)
                .map_err(|_| DbViewError::Config(format!("invalid log level: {}", level))),
        }
    }
}

/// Settings applied to every opened database handle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub busy_timeout_ms: Option<u64>,
    pub foreign_keys: Option<bool>,
}

/// Loads configuration from a TOML file at the given path.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| DbViewError::Config(e.to_string()))?;
    config.log.max_level()?;
    Ok(config)
}
