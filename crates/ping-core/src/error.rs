//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating monitor config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no target URL given")]
    MissingTarget,

    #[error("invalid URL {0:?}: expected an http:// or https:// address")]
    InvalidUrl(String),

    #[error("interval must be a finite, non-negative number of seconds (got {0})")]
    InvalidInterval(f64),

    #[error("unknown rotation {0:?} (expected daily or per-run)")]
    UnknownRotation(String),
}
