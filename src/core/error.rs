use thiserror::Error;

use crate::shared::validation::FieldErrors;

/// Fallback text for failures that carry no usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Unknown error.";

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    /// Local, field-scoped errors. Raised before anything is sent.
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// The request never reached the backend or no response came back.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered but declined the operation.
    #[error("Application error: {0}")]
    Application(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text shown to the user in an alert
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!("Submission blocked by {} field error(s)", errors.len());
                "Please fix the highlighted fields.".to_string()
            }
            AppError::Transport(ref msg) => {
                tracing::error!("Transport error: {}", msg);
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::Application(ref msg) | AppError::NotFound(ref msg) => msg.clone(),
            AppError::Config(ref msg) | AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Save task did not complete: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_shown_verbatim() {
        let err = AppError::Application("Oportunidade não encontrada".to_string());
        assert_eq!(err.user_message(), "Oportunidade não encontrada");
    }

    #[test]
    fn test_transport_message_is_generic() {
        let err = AppError::Transport("connection refused (os error 111)".to_string());
        let msg = err.user_message();
        assert!(!msg.contains("os error"));
        assert!(msg.contains("server"));
    }

    #[test]
    fn test_validation_is_flagged() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        let err = AppError::Validation(errors);
        assert!(err.is_validation());
        assert!(err.to_string().contains("title: Title is required"));
    }
}
