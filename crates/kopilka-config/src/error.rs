//! Error types for kopilka-config

use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {message} (see `kopilka --print-default-config`)")]
    InvalidYaml { message: String },

    #[error("Invalid value of {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
