use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{AppError, Result};

/// Backend answer for mutating calls: `{"success": bool, ...}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
            ..Default::default()
        }
    }

    /// Turn `success: false` into an application error carrying the backend's message
    pub fn into_result(self, fallback: &str) -> Result<ActionResponse> {
        if self.success {
            return Ok(self);
        }
        let message = ErrorPayload {
            detail: self.detail,
            error: self.error,
        }
        .message()
        .unwrap_or_else(|| fallback.to_string());
        Err(AppError::Application(message))
    }
}

/// Structured error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// `detail` when it is a non-empty string, otherwise `error`
    pub fn message(&self) -> Option<String> {
        let detail = self
            .detail
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        detail.or_else(|| self.error.clone().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Info,
    Error,
}

/// Visible status line, either inside the modal or on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Error,
            message: message.into(),
        }
    }
}
