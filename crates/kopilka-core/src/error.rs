//! Error types for kopilka-core
//!
//! Construction errors propagate to the caller. Everything else that goes
//! wrong inside a page controller is reported through an [`ErrorLogger`] and
//! stays local.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable code carried in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    AccountNotFound,
    RemoteError,
    TransportError,
    InvalidFormat,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::RemoteError => "REMOTE_ERROR",
            ErrorCode::TransportError => "TRANSPORT_ERROR",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How loudly a locally handled error is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    pub fn level(&self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

/// Serializable form of an error, sent in `{success: false}` bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Main error type for kopilka-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

impl CoreError {
    /// Shorthand for the construction precondition failure
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument { message: message.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::Remote { .. } => ErrorCode::RemoteError,
            CoreError::Transport { .. } => ErrorCode::TransportError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidArgument { .. } => ErrorSeverity::Critical,
            CoreError::AccountNotFound { .. } => ErrorSeverity::Info,
            CoreError::Remote { .. } | CoreError::Transport { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Warning,
        }
    }

    /// HTTP status that best describes the error
    pub fn status(&self) -> u16 {
        match self {
            CoreError::InvalidArgument { .. } | CoreError::InvalidFormat { .. } => 400,
            CoreError::AccountNotFound { .. } => 404,
            CoreError::Remote { status, .. } => *status,
            CoreError::Transport { .. } => 502,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());
        match self {
            CoreError::AccountNotFound { id } => {
                details.details = Some(serde_json::json!({ "account_id": id }));
                details.suggestion = Some("The account may have been removed in another window".to_string());
            }
            CoreError::Remote { status, .. } => {
                details.details = Some(serde_json::json!({ "status": status }));
            }
            CoreError::Transport { .. } => {
                details.suggestion = Some("Check the network connection and try again".to_string());
            }
            CoreError::InvalidArgument { .. } | CoreError::InvalidFormat { .. } => {}
        }
        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Observability channel for errors handled locally
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::log!(
            target: "kopilka::error",
            error.severity().level(),
            "[{}] {} - Operation: {} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "kopilka::error",
            "WARNING: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================
