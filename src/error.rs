//! Error handling module for raflow
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Incomplete user input is not an error here: the wizard reports it through
//! [`NavigationError`] and the renderer keeps its continue affordance disabled.

use thiserror::Error;

/// Main error type for raflow
#[derive(Error, Debug)]
pub enum FlowError {
    /// IO errors (settings files, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation of settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (rejected form updates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wizard navigation errors
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for raflow operations
pub type Result<T> = std::result::Result<T, FlowError>;

// Convenient error constructors
impl FlowError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlowError::config("tick interval must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: tick interval must be positive"
        );

        let err = FlowError::validation("plan index 7 out of range");
        assert_eq!(err.to_string(), "Validation error: plan index 7 out of range");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FlowError = io_err.into();
        assert!(matches!(err, FlowError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(FlowError::terminal("raw mode"), FlowError::Terminal(_)));
        assert!(matches!(FlowError::general("oops"), FlowError::General(_)));
    }
}
