//! Error types and handling for `GeoDash`

use thiserror::Error;

use crate::sources::SourceError;

/// Main error type for the `GeoDash` application
#[derive(Error, Debug)]
pub enum GeodashError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream source failures that escaped a single card
    #[error("Source error: {source}")]
    Source {
        #[from]
        source: SourceError,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl GeodashError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GeodashError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            GeodashError::Source { source } => source.user_message(),
            GeodashError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = GeodashError::config("missing base url");
        assert!(matches!(config_err, GeodashError::Config { .. }));

        let validation_err = GeodashError::validation("invalid coordinates");
        assert!(matches!(validation_err, GeodashError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = GeodashError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = GeodashError::validation("latitude out of range");
        assert!(validation_err.user_message().contains("latitude out of range"));

        let source_err: GeodashError = SourceError::Transport("connection refused".into()).into();
        assert!(source_err.user_message().contains("Unable to reach"));
    }
}
