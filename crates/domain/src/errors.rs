//! Error types used throughout the console

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{HTTP_STATUS_APP_UNAUTHORIZED_RANGE, HTTP_STATUS_UNAUTHORIZED};

/// Main error type for evdash
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for evdash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Failure of a remote fetch, classified the way the console reacts to it.
///
/// The classification is driven by the HTTP status; status `0` stands for a
/// request that never reached the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection lost (status 0)
    #[error("Central server unreachable: {0}")]
    Unreachable(String),

    /// Session expired or missing (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Application-level authorization refusal (550 series)
    #[error("Not authorized (status {status}): {message}")]
    AppUnauthorized { status: u16, message: String },

    /// Any other non-success status
    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Body could not be decoded into the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            0 => Self::Unreachable(message),
            HTTP_STATUS_UNAUTHORIZED => Self::Unauthorized(message),
            s if HTTP_STATUS_APP_UNAUTHORIZED_RANGE.contains(&s) => {
                Self::AppUnauthorized { status: s, message }
            }
            s => Self::Server { status: s, message },
        }
    }

    /// HTTP status the error was classified from (`0` for transport failures).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unreachable(_) => Some(0),
            Self::Unauthorized(_) => Some(HTTP_STATUS_UNAUTHORIZED),
            Self::AppUnauthorized { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Decode(_) => None,
        }
    }

    /// Stable label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Unauthorized(_) => "unauthorized",
            Self::AppUnauthorized { .. } => "app_unauthorized",
            Self::Server { .. } => "server",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
