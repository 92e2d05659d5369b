//! Error types for sfinweb-core
//!
//! Every backend interaction and route resolution reports failures as a
//! [`CoreError`]. Views surface them to the user through the API-error
//! notice; the web layer maps them to HTTP status codes.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The backend could not be reached
    RequestFailed,
    /// The backend answered with a non-success status
    UpstreamStatus,
    /// The backend answered with an unreadable body
    InvalidResponse,
    /// Transaction not found
    TransactionNotFound,
    /// Validation error
    ValidationError,
    /// Unknown route parameter
    InvalidRoute,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::RequestFailed => write!(f, "REQUEST_FAILED"),
            ErrorCode::UpstreamStatus => write!(f, "UPSTREAM_STATUS"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidRoute => write!(f, "INVALID_ROUTE"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for error pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            suggestions: vec![],
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the user can correct and retry
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for sfinweb-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Request failed: {message}")]
    Request { message: String },

    #[error("Service responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {message}")]
    Decode { message: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid route parameter: {value}")]
    InvalidRoute { value: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Request { .. } => ErrorCode::RequestFailed,
            CoreError::Status { .. } => ErrorCode::UpstreamStatus,
            CoreError::Decode { .. } => ErrorCode::InvalidResponse,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::InvalidRoute { .. } => ErrorCode::InvalidRoute,
            CoreError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Request { .. } => ErrorSeverity::Error,
            CoreError::Status { status, .. } if *status < 500 => ErrorSeverity::Warning,
            CoreError::Status { .. } => ErrorSeverity::Error,
            CoreError::Decode { .. } => ErrorSeverity::Error,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::Validation { .. } => ErrorSeverity::Warning,
            CoreError::InvalidRoute { .. } => ErrorSeverity::Info,
            CoreError::Internal { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Request { .. } => {
                details = details.with_suggestion(
                    "Check that the sfinapp service is running and api.base_url points to it.".to_string()
                );
            }
            CoreError::Status { status, .. } if *status >= 500 => {
                details = details.with_suggestion(
                    "The service failed to process the request; check its logs.".to_string()
                );
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "The transaction may have been deleted. Open the transaction list to pick another one.".to_string()
                );
            }
            CoreError::InvalidRoute { .. } => {
                details = details.with_suggestion(
                    "Transaction ids are numeric; use 'new' to create a transaction.".to_string()
                );
            }
            CoreError::Validation { .. } => {
                details = details.with_suggestion(
                    "Correct the value and submit the form again.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
