//! Configuration errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scan configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed scan config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scan config: {0}")]
    Invalid(String),
}
