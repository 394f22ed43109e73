use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// Failure payload returned by the backend. Either field may be present;
/// `detail` is not always a string (validation failures carry a list).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
            message: None,
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self.detail {
            Some(Value::String(text)) if !text.is_empty() => return Some(text),
            Some(Value::Null) | None => {}
            Some(Value::String(_)) => {}
            Some(other) => return Some(other.to_string()),
        }
        self.message.filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?} ({status}): {message}")]
pub struct RemoteRejection {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl RemoteRejection {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: ErrorCode::from_status(status),
            message: message.into(),
        }
    }
}
