use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::utils::storage::SessionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{detail}")]
    Status { status: StatusCode, detail: String },
    #[error("Session expired, please sign in again")]
    SessionExpired,
    #[error("Access denied. Admin privileges required.")]
    AccessDenied,
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] SessionError),
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Request(_) => "REQUEST_FAILED",
            ApiError::Status { .. } => "HTTP_ERROR",
            ApiError::SessionExpired => "SESSION_EXPIRED",
            ApiError::AccessDenied => "ACCESS_DENIED",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(err) => err.status(),
            _ => None,
        }
    }

    /// Failures that end the session rather than a single operation.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::SessionExpired | ApiError::AccessDenied)
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|value| detail_message(&value)),
            Err(err) => {
                tracing::debug!(error = %err, "failed to read error body");
                None
            }
        };
        ApiError::Status {
            status,
            detail: detail.unwrap_or_else(|| format!("Request failed with status {}", status)),
        }
    }
}

/// Extracts the `detail` field of an error body; non-string details are
/// rendered as compact JSON.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_prefers_string_messages() {
        assert_eq!(
            detail_message(&json!({ "detail": "Event not found" })).as_deref(),
            Some("Event not found")
        );
    }

    #[test]
    fn detail_renders_structured_validation_errors() {
        let body = json!({ "detail": [{ "loc": ["body", "email"], "msg": "field required" }] });
        let detail = detail_message(&body).unwrap();
        assert!(detail.contains("field required"));
    }

    #[test]
    fn detail_missing_or_empty_yields_none() {
        assert!(detail_message(&json!({})).is_none());
        assert!(detail_message(&json!({ "detail": "" })).is_none());
        assert!(detail_message(&json!({ "detail": null })).is_none());
    }

    #[test]
    fn codes_and_auth_classification() {
        assert_eq!(ApiError::SessionExpired.code(), "SESSION_EXPIRED");
        assert_eq!(ApiError::validation("bad").code(), "VALIDATION_ERROR");
        assert!(ApiError::AccessDenied.is_auth_failure());
        assert!(ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            detail: "nope".into()
        }
        .is_auth_failure());
        assert!(!ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: "missing".into()
        }
        .is_auth_failure());
    }

    #[test]
    fn display_uses_detail_text() {
        let err = ApiError::Status {
            status: StatusCode::CONFLICT,
            detail: "Email already registered".into(),
        };
        assert_eq!(err.to_string(), "Email already registered");
    }
}
