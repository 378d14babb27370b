//! Configuration management for kopilka
//!
//! This module handles loading, validation, and management of
//! kopilka configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Texts and glyphs shown by the transactions page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Title shown while no account is selected
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,
    /// Prompt shown before an account is removed
    #[serde(default = "default_confirm_remove_account")]
    pub confirm_remove_account: String,
    /// Prompt shown before a transaction is removed
    #[serde(default = "default_confirm_remove_transaction")]
    pub confirm_remove_transaction: String,
    /// Glyph appended to every amount
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            placeholder_title: default_placeholder_title(),
            confirm_remove_account: default_confirm_remove_account(),
            confirm_remove_transaction: default_confirm_remove_transaction(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_placeholder_title() -> String {
    "Название счёта".to_string()
}

fn default_confirm_remove_account() -> String {
    "Вы действительно хотите удалить счёт?".to_string()
}

fn default_confirm_remove_transaction() -> String {
    "Вы действительно хотите удалить эту транзакцию?".to_string()
}

fn default_currency_symbol() -> String {
    "₽".to_string()
}

/// In-memory data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Fill the store with a few demo accounts on startup
    #[serde(default = "default_true")]
    pub seed_demo: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { seed_demo: true }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Page texts
    #[serde(default)]
    pub page: PageConfig,
    /// Data settings
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)?;

        Self::from_yaml(&content)
    }

    /// Load the file when present; `None` when there is no such file
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::load(path.to_path_buf()) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::FileNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let labels = [
            ("page.placeholder_title", &self.page.placeholder_title),
            ("page.confirm_remove_account", &self.page.confirm_remove_account),
            ("page.confirm_remove_transaction", &self.page.confirm_remove_transaction),
        ];
        for (field, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Label must not be empty".to_string(),
                });
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: "Log level must be one of trace, debug, info, warn, error, off".to_string(),
            }),
        }
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================
