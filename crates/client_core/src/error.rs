use shared::error::{ErrorCode, RemoteRejection};
use thiserror::Error;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

#[derive(Debug, Error)]
pub enum ClientError {
    /// A required field was empty; nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("{}", .0.message)]
    Rejected(#[from] RemoteRejection),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no session token present")]
    Unauthenticated,
    #[error("token store failure: {0}")]
    TokenStore(String),
}

impl ClientError {
    pub fn required_fields() -> Self {
        Self::Validation(REQUIRED_FIELDS_MESSAGE.to_string())
    }

    /// Text shown to the user at the UI boundary.
    pub fn display_message(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// No token, or the backend refused the one we sent.
    pub fn needs_sign_in(&self) -> bool {
        match self {
            Self::Unauthenticated => true,
            Self::Rejected(rejection) => rejection.code == ErrorCode::Unauthorized,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
