//! Error types for the task board

use thiserror::Error;

/// Result type for task board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Input that failed validation before any mutation happened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title was empty after sanitizing
    #[error("Task title cannot be empty")]
    EmptyTitle,

    /// Title exceeds the length bound
    #[error("Task title is too long (max {max} characters)")]
    TitleTooLong { len: usize, max: usize },

    /// Import payload is malformed
    #[error("Invalid import file: {message}")]
    InvalidImport { message: String },
}

impl ValidationError {
    /// Create an invalid import error
    pub fn invalid_import(message: impl Into<String>) -> Self {
        Self::InvalidImport {
            message: message.into(),
        }
    }
}

/// Errors that can occur in task board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Input rejected before mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Index outside of a column's task list
    #[error("index {index} out of range for column '{column}' with {len} tasks")]
    IndexOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },

    /// Another import has not completed yet
    #[error("an import is already in progress")]
    ImportInProgress,

    /// A key-value slot could not be read or written
    #[error("storage error for '{key}': {message}")]
    Storage { key: String, message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a storage error
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid import error
    pub fn invalid_import(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::invalid_import(message))
    }

    /// Not-found errors are a lenient no-op and never reach the user
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound { .. } | Self::ColumnNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::TaskNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyTitle.to_string(),
            "Task title cannot be empty"
        );
        let err = ValidationError::TitleTooLong { len: 501, max: 500 };
        assert_eq!(err.to_string(), "Task title is too long (max 500 characters)");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: BoardError = ValidationError::invalid_import("not an array").into();
        assert_eq!(err.to_string(), "Invalid import file: not an array");
        assert!(err.is_validation());
    }

    #[test]
    fn test_silent() {
        assert!(BoardError::ColumnNotFound { id: "x".into() }.is_silent());
        assert!(!BoardError::ImportInProgress.is_silent());
        assert!(!BoardError::storage("kanbanTasks", "disk full").is_silent());
    }
}
