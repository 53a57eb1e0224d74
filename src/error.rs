//! Custom error types and handling
//!
//! This module defines the console's error types. Every failure that reaches the
//! user is turned into a toast through [`AdminError::user_message`].

use validator::ValidationErrors;

use crate::testcases::TestcaseFileError;

/// Failure reported by a REST collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Whether trying the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::NotFound(_) => false,
        }
    }
}

/// Console-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // Client-side schema violations
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    // Rejected test-case file
    #[error("Invalid test case file: {0}")]
    InvalidFile(#[from] TestcaseFileError),

    // Collaborator failures
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidFile(_) => "INVALID_FILE",
            Self::Service(_) => "SERVICE_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the user in a toast
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please fix the highlighted fields".to_string(),
            Self::InvalidFile(e) => e.to_string(),
            Self::Service(ServiceError::Http { message, .. }) if !message.is_empty() => {
                message.clone()
            }
            Self::Service(ServiceError::NotFound(_)) => {
                "The requested item no longer exists".to_string()
            }
            Self::Service(e) if e.is_retryable() => {
                "Request failed, please try again".to_string()
            }
            Self::Service(e) => e.to_string(),
            Self::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An unexpected error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Names of the fields that failed validation, if any
    pub fn failing_fields(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.errors().keys().map(|k| k.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(err: ValidationErrors) -> Self {
        AdminError::Validation(err)
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

/// Result type alias for collaborator calls
pub type ServiceResult<T> = Result<T, ServiceError>;
