//! Error handling for EventHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. All domain failures are
//! final outcomes; nothing here carries retry semantics.

use thiserror::Error;

/// Main error type for the EventHub core
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("File not found: {file_id}")]
    FileNotFound { file_id: i64 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Already registered for event {event_id}")]
    AlreadyRegistered { event_id: i64 },

    #[error("Event {event_id} has reached its capacity")]
    EventFull { event_id: i64 },

    #[error("Not registered for event {event_id}")]
    NotRegistered { event_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for EventHub operations
pub type Result<T> = std::result::Result<T, EventHubError>;

impl EventHubError {
    /// Whether the error is the caller's fault (bad input, missing rights,
    /// state conflict) as opposed to an infrastructure failure. The boundary
    /// layer uses this to pick 4xx vs 5xx.
    pub fn is_client_error(&self) -> bool {
        match self {
            EventHubError::Database(_) => false,
            EventHubError::Migration(_) => false,
            EventHubError::Config(_) => false,
            EventHubError::Io(_) => false,
            EventHubError::Forbidden(_) => true,
            EventHubError::EventNotFound { .. } => true,
            EventHubError::UserNotFound { .. } => true,
            EventHubError::FileNotFound { .. } => true,
            EventHubError::InvalidStateTransition { .. } => true,
            EventHubError::AlreadyRegistered { .. } => true,
            EventHubError::EventFull { .. } => true,
            EventHubError::NotRegistered { .. } => true,
            EventHubError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventHubError::Database(_) => ErrorSeverity::Critical,
            EventHubError::Migration(_) => ErrorSeverity::Critical,
            EventHubError::Config(_) => ErrorSeverity::Critical,
            EventHubError::Io(_) => ErrorSeverity::Error,
            EventHubError::Forbidden(_) => ErrorSeverity::Warning,
            EventHubError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Info,
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
