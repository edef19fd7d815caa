//! Conversions from external infrastructure errors into domain errors.

use std::time::Duration;

use evdash_common::{ErrorClassification, ErrorSeverity};
use evdash_domain::DashError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DashError);

impl From<InfraError> for DashError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DashError> for InfraError {
    fn from(value: DashError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDashError {
    fn into_dash(self) -> DashError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DashError */
/* -------------------------------------------------------------------------- */

impl IntoDashError for HttpError {
    fn into_dash(self) -> DashError {
        if self.is_timeout() {
            return DashError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DashError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return DashError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return DashError::Serialization(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => DashError::Auth(message),
                404 => DashError::NotFound(message),
                400..=499 => DashError::InvalidInput(message),
                _ => DashError::Network(message),
            };
        }

        DashError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_dash())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io / config formats → DashError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(DashError::Config(format!("I/O failure: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(DashError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(DashError::Serialization(value.to_string()))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(DashError::Config(format!("Invalid URL: {value}")))
    }
}

impl ErrorClassification for InfraError {
    fn is_retryable(&self) -> bool {
        matches!(self.0, DashError::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self.0 {
            DashError::Network(_) | DashError::Auth(_) => ErrorSeverity::Warning,
            DashError::NotFound(_) => ErrorSeverity::Info,
            DashError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self.0, DashError::Internal(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
