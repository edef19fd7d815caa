//! API-specific error types
//!
//! Every failure of a central server call is an [`ApiError`]. Status
//! failures keep the HTTP status so the table layer can react to it through
//! [`ApiError::into_fetch_error`]; transport failures count as status `0`.

use std::time::Duration;

use evdash_common::{ErrorClassification, ErrorSeverity};
use evdash_domain::constants::{HTTP_STATUS_APP_UNAUTHORIZED_RANGE, HTTP_STATUS_UNAUTHORIZED};
use evdash_domain::{DashError, FetchError};
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403, 550 series)
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) and undecodable bodies
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}: {message}")]
    Status { status: u16, url: String, message: String },

    /// No access token could be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of the failure; `0` when the server was never reached.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Timeout(_) => Some(0),
            Self::Auth(_) => Some(HTTP_STATUS_UNAUTHORIZED),
            Self::Decode(_) | Self::Config(_) => None,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Status { status, .. } => match *status {
                401 | 403 => ApiErrorCategory::Authentication,
                s if HTTP_STATUS_APP_UNAUTHORIZED_RANGE.contains(&s) => {
                    ApiErrorCategory::Authentication
                }
                429 => ApiErrorCategory::RateLimit,
                500..=599 => ApiErrorCategory::Server,
                400..=499 => ApiErrorCategory::Client,
                _ => ApiErrorCategory::Network,
            },
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Client,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::Client
            | ApiErrorCategory::Config => 0,
        }
    }

    /// Classify the failure the way the table layer reacts to it.
    pub fn into_fetch_error(self) -> FetchError {
        match self {
            Self::Status { status, message, .. } => FetchError::from_status(status, message),
            Self::Auth(message) => FetchError::Unauthorized(message),
            Self::Decode(message) => FetchError::Decode(message),
            other @ (Self::Network(_) | Self::Timeout(_) | Self::Config(_)) => {
                FetchError::Unreachable(other.to_string())
            }
        }
    }

    pub(crate) fn from_dash(err: DashError) -> Self {
        match err {
            DashError::Network(message) => Self::Network(message),
            DashError::Auth(message) => Self::Auth(message),
            DashError::Config(message) | DashError::InvalidInput(message) => Self::Config(message),
            DashError::Serialization(message) => Self::Decode(message),
            DashError::NotFound(message) | DashError::Internal(message) => Self::Network(message),
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        err.into_fetch_error()
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        self.should_retry()
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ApiErrorCategory::Authentication
            | ApiErrorCategory::RateLimit
            | ApiErrorCategory::Network => ErrorSeverity::Warning,
            ApiErrorCategory::Server | ApiErrorCategory::Client => ErrorSeverity::Error,
            ApiErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        self.category() == ApiErrorCategory::Config
    }

    fn retry_after(&self) -> Option<Duration> {
        match self.retry_delay_secs() {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
