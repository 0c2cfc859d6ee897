use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the config, logging and CLI layers.
///
/// The flag core never returns errors of its own; failures it classifies are
/// data inside an [`ErrorAggregator`](crate::ErrorAggregator).
#[derive(Error, Debug)]
pub enum ErrflagsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LogSetupError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to decode config {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config defaults: {0}")]
    Defaults(#[from] toml::ser::Error),

    #[error("Config {origin} is missing required parameters: {}", .fields.join(", "))]
    MissingFields { origin: String, fields: Vec<String> },
}

impl ConfigError {
    /// Every required key the decoded file lacked.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            ConfigError::MissingFields { fields, .. } => fields,
            _ => &[],
        }
    }
}

#[derive(Error, Debug)]
pub enum LogSetupError {
    #[error("log level not recognized '{0}'")]
    UnknownLevel(String),

    #[error("Failed to open log output {path}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ErrflagsError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_CHECK_FAILED: u8 = 3;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<ErrflagsError>() {
        return match err {
            ErrflagsError::Config(_) => EXIT_CONFIG_ERROR,
            ErrflagsError::Logging(_) => EXIT_CONFIG_ERROR,
            ErrflagsError::Other(_) => EXIT_ERROR,
        };
    }

    if e.downcast_ref::<ConfigError>().is_some() || e.downcast_ref::<LogSetupError>().is_some() {
        return EXIT_CONFIG_ERROR;
    }

    EXIT_ERROR
}
