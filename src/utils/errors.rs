//! Error handling for FlexTime
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the FlexTime application
#[derive(Error, Debug)]
pub enum FlexTimeError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Email delivery error: {0}")]
    Email(#[from] EmailError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: Uuid },

    #[error("Flex date not found: {reference}")]
    FlexDateNotFound { reference: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: Uuid },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: Uuid },

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Email delivery API specific errors
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email API request failed: {0}")]
    RequestFailed(String),

    #[error("Email API timeout")]
    Timeout,

    #[error("Invalid email API response: {0}")]
    InvalidResponse(String),

    #[error("Email service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for FlexTime operations
pub type Result<T> = std::result::Result<T, FlexTimeError>;

/// Result type alias for email delivery operations
pub type EmailResult<T> = std::result::Result<T, EmailError>;

/// HTTP-style status class surfaced to callers of the workflow operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl StatusClass {
    /// Canonical HTTP status code for this class
    pub fn http_status(&self) -> u16 {
        match self {
            StatusClass::Unauthorized => 401,
            StatusClass::Forbidden => 403,
            StatusClass::NotFound => 404,
            StatusClass::Validation => 400,
            StatusClass::Conflict => 409,
            StatusClass::Internal => 500,
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusClass::Unauthorized => write!(f, "unauthorized"),
            StatusClass::Forbidden => write!(f, "forbidden"),
            StatusClass::NotFound => write!(f, "not-found"),
            StatusClass::Validation => write!(f, "validation"),
            StatusClass::Conflict => write!(f, "conflict"),
            StatusClass::Internal => write!(f, "internal"),
        }
    }
}

impl FlexTimeError {
    /// Classify the error for the caller-facing surface. Validation and
    /// Conflict carry detail the caller can act on; internal classes are
    /// surfaced generically.
    pub fn status_class(&self) -> StatusClass {
        match self {
            FlexTimeError::Unauthenticated(_) => StatusClass::Unauthorized,
            FlexTimeError::Forbidden(_) => StatusClass::Forbidden,
            FlexTimeError::UserNotFound { .. }
            | FlexTimeError::FlexDateNotFound { .. }
            | FlexTimeError::SessionNotFound { .. }
            | FlexTimeError::RegistrationNotFound { .. }
            | FlexTimeError::NotificationNotFound { .. } => StatusClass::NotFound,
            FlexTimeError::Validation(_) => StatusClass::Validation,
            FlexTimeError::Conflict(_) => StatusClass::Conflict,
            FlexTimeError::Database(_)
            | FlexTimeError::Migration(_)
            | FlexTimeError::Email(_)
            | FlexTimeError::Http(_)
            | FlexTimeError::Config(_)
            | FlexTimeError::Serialization(_)
            | FlexTimeError::Io(_) => StatusClass::Internal,
        }
    }

    /// Check if the error is recoverable by correcting the input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.status_class(),
            StatusClass::Validation | StatusClass::Conflict | StatusClass::NotFound
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FlexTimeError::Database(_) => ErrorSeverity::Critical,
            FlexTimeError::Migration(_) => ErrorSeverity::Critical,
            FlexTimeError::Config(_) => ErrorSeverity::Critical,
            FlexTimeError::Email(_) => ErrorSeverity::Warning,
            FlexTimeError::Http(_) => ErrorSeverity::Warning,
            FlexTimeError::Unauthenticated(_) => ErrorSeverity::Warning,
            FlexTimeError::Forbidden(_) => ErrorSeverity::Warning,
            FlexTimeError::Validation(_) => ErrorSeverity::Info,
            FlexTimeError::Conflict(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        let err = FlexTimeError::Unauthenticated("no token".to_string());
        assert_eq!(err.status_class(), StatusClass::Unauthorized);
        assert_eq!(err.status_class().http_status(), 401);

        let err = FlexTimeError::Forbidden("teachers only".to_string());
        assert_eq!(err.status_class(), StatusClass::Forbidden);

        let err = FlexTimeError::SessionNotFound {
            session_id: Uuid::nil(),
        };
        assert_eq!(err.status_class(), StatusClass::NotFound);

        let err = FlexTimeError::Validation("deadline passed".to_string());
        assert_eq!(err.status_class(), StatusClass::Validation);
        assert_eq!(err.status_class().http_status(), 400);

        let err = FlexTimeError::Conflict("Session full".to_string());
        assert_eq!(err.status_class(), StatusClass::Conflict);
        assert_eq!(err.status_class().http_status(), 409);

        let err = FlexTimeError::Config("missing secret".to_string());
        assert_eq!(err.status_class(), StatusClass::Internal);
    }

    #[test]
    fn test_recoverability() {
        assert!(FlexTimeError::Validation("bad date".to_string()).is_recoverable());
        assert!(FlexTimeError::Conflict("duplicate".to_string()).is_recoverable());
        assert!(!FlexTimeError::Config("broken".to_string()).is_recoverable());
        assert!(!FlexTimeError::Unauthenticated("no caller".to_string()).is_recoverable());
    }

    #[test]
    fn test_email_error_severity() {
        let err = FlexTimeError::Email(EmailError::Timeout);
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.status_class(), StatusClass::Internal);
    }

    #[test]
    fn test_status_class_display() {
        assert_eq!(StatusClass::NotFound.to_string(), "not-found");
        assert_eq!(StatusClass::Internal.to_string(), "internal");
    }
}
