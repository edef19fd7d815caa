//! Table errors and the reaction to failed fetches

use std::time::Duration;

use evdash_common::error::{ErrorClassification, ErrorSeverity};
use evdash_domain::constants::{LOGIN_ROUTE, MESSAGE_NOT_AUTHORIZED};
use evdash_domain::{DashError, FetchError};
use thiserror::Error;
use tracing::{info, warn};

use super::polling::PollingError;
use super::ports::Collaborators;

/// Errors surfaced by table operations
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Domain(#[from] DashError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Polling(#[from] PollingError),
}

impl ErrorClassification for TableError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(FetchError::Unreachable(_)) => true,
            Self::Fetch(FetchError::Server { status, .. }) => *status >= 500,
            Self::Polling(err) => err.is_retryable(),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Domain(DashError::NotFound(_)) => ErrorSeverity::Info,
            Self::Domain(DashError::Internal(_)) => ErrorSeverity::Critical,
            Self::Domain(_) => ErrorSeverity::Error,
            Self::Fetch(FetchError::Unauthorized(_) | FetchError::AppUnauthorized { .. }) => {
                ErrorSeverity::Warning
            }
            Self::Fetch(FetchError::Unreachable(_)) => ErrorSeverity::Warning,
            Self::Fetch(_) => ErrorSeverity::Error,
            Self::Polling(err) => err.severity(),
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Domain(DashError::Internal(_)))
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Maps a failed fetch onto UI reactions.
///
/// Errors stop here: nothing is retried and nothing is propagated to the
/// rendering layer.
#[derive(Clone)]
pub struct HttpErrorHandler {
    collaborators: Collaborators,
}

impl HttpErrorHandler {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    pub async fn handle(&self, error: &FetchError, message_key: &str) {
        match error {
            FetchError::Unreachable(reason) => {
                warn!(reason = %reason, "central server unreachable");
                self.collaborators.notifier.show_connection_lost();
                if self.collaborators.auth.is_authenticated() {
                    self.collaborators.auth.logout().await;
                }
                self.collaborators.navigator.navigate(LOGIN_ROUTE);
            }
            FetchError::Unauthorized(_) => {
                info!("session rejected, redirecting to login");
                self.collaborators.navigator.navigate(LOGIN_ROUTE);
            }
            FetchError::AppUnauthorized { status, .. } => {
                warn!(status, "request refused by authorization rules");
                self.collaborators.notifier.show_error(MESSAGE_NOT_AUTHORIZED);
            }
            other => {
                warn!(
                    kind = other.label(),
                    status = ?other.status(),
                    error = %other,
                    "backend request failed"
                );
                self.collaborators.notifier.show_error(message_key);
            }
        }
    }
}
