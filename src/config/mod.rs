//! Configuration Management
//!
//! Loads the application settings from TOML. Settings currently cover the
//! logging output:
//! - destination (`stdout`, `stderr` or a file path)
//! - level
//! - colors and output format
//!
//! Generic decoding with defaults and required keys lives in [`decode`].

pub mod decode;

pub use decode::{decode_config_str, missing_fields, parse_config_file, Conf};

use crate::errors::{ConfigError, LogSetupError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Config file name looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "conf.toml";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines (default)
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// `stderr` (default), `stdout`, or a file path (truncated on open)
    #[serde(default = "default_output")]
    pub output: String,
    /// trace, debug, info, warn, error (fatal and panic map to error)
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub colors: bool,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            level: default_level(),
            colors: false,
            format: LogFormat::default(),
        }
    }
}

fn default_output() -> String {
    "stderr".to_string()
}
fn default_level() -> String {
    "info".to_string()
}

impl LogSettings {
    pub fn output_target(&self) -> LogOutput {
        match self.output.as_str() {
            "stdout" => LogOutput::Stdout,
            "stderr" | "" => LogOutput::Stderr,
            path => LogOutput::File(PathBuf::from(path)),
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter, LogSetupError> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" => Ok(LevelFilter::INFO),
            "warn" | "warning" => Ok(LevelFilter::WARN),
            "error" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
            "off" => Ok(LevelFilter::OFF),
            _ => Err(LogSetupError::UnknownLevel(self.level.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogSettings,
}

impl Conf for Settings {}

impl Settings {
    /// Load settings from `path`, or from the first default location that
    /// exists, or fall back to defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(p) => parse_config_file(p)?,
            None => match default_paths().into_iter().find(|p| p.is_file()) {
                Some(p) => parse_config_file(&p)?,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply `ERRFLAGS_LOG_*` overrides read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("ERRFLAGS_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(output) = lookup("ERRFLAGS_LOG_OUTPUT") {
            self.log.output = output;
        }
        if let Some(colors) = lookup("ERRFLAGS_LOG_COLORS") {
            self.log.colors = matches!(colors.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
        }
    }
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(DEFAULT_CONFIG_FILE),
        PathBuf::from("errflags.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("errflags").join("config.toml"));
    }
    paths
}
