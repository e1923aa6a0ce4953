use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// Transient operator-facing message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Maps a failed operation to a notice. Backend details and messages
    /// written for the operator win over `fallback`; transport and decoding
    /// problems only show `fallback`.
    pub fn failure(fallback: &str, error: &ApiError) -> Self {
        let message = match error {
            ApiError::Status { .. }
            | ApiError::SessionExpired
            | ApiError::AccessDenied
            | ApiError::Validation(_) => error.to_string(),
            ApiError::Request(_) | ApiError::Decode(_) | ApiError::Storage(_) => {
                fallback.to_string()
            }
        };
        let level = if error.is_auth_failure() {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Error
        };
        Self { level, message }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn backend_detail_wins_over_fallback() {
        let err = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            detail: "Event has active bookings".into(),
        };
        let notice = Notice::failure("Failed to delete event", &err);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Event has active bookings");
    }

    #[test]
    fn decode_failures_use_fallback() {
        let err = ApiError::Decode("expected value at line 1".into());
        let notice = Notice::failure("Failed to load dashboard statistics", &err);
        assert_eq!(notice.message, "Failed to load dashboard statistics");
    }

    #[test]
    fn auth_failures_are_warnings() {
        let notice = Notice::failure("Failed to load users", &ApiError::SessionExpired);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.to_string(), "[warning] Session expired, please sign in again");
    }

    #[test]
    fn success_notice_display() {
        assert_eq!(
            Notice::success("Event published").to_string(),
            "[success] Event published"
        );
    }
}
