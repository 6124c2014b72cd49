//! Error types for the forecast download services.

use thiserror::Error;

/// Result type alias using ForecastError.
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Primary error type for forecast job handling.
#[derive(Debug, Error)]
pub enum ForecastError {
    // === Request Validation Errors ===
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid model identifier: {0}")]
    InvalidModel(String),

    #[error("Invalid initialization time: {0}")]
    InvalidTime(String),

    // === Retrieval Errors ===
    #[error("Fetch failed: {0}")]
    Fetch(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    StorageAccess(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ForecastError {
    /// Build an `InvalidField` error from any displayable cause.
    pub fn invalid_field(field: &str, cause: impl std::fmt::Display) -> Self {
        ForecastError::InvalidField {
            field: field.to_string(),
            message: cause.to_string(),
        }
    }

    pub fn invalid_body(cause: impl std::fmt::Display) -> Self {
        ForecastError::InvalidBody(cause.to_string())
    }

    /// Name of the request field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ForecastError::MissingField(field) => Some(field.as_str()),
            ForecastError::InvalidField { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Whether this error was caused by the caller's request.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForecastError::MissingField(_)
                | ForecastError::InvalidField { .. }
                | ForecastError::InvalidBody(_)
                | ForecastError::InvalidModel(_)
                | ForecastError::InvalidTime(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        if self.is_validation() {
            400
        } else {
            500
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::StorageAccess(err.to_string())
    }
}
