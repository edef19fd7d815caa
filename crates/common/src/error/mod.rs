//! Shared error vocabulary
//!
//! Every crate keeps its own error enum and folds the cases it shares with
//! the others into [`CommonError`]. [`ErrorClassification`] is the one
//! question every error must answer: can the caller try again, and how loud
//! should the log line be.
//!
//! ```rust,ignore
//! #[derive(Debug, thiserror::Error)]
//! pub enum PollingError {
//!     #[error("Polling interval must be greater than zero")]
//!     ZeroInterval,
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(PollingError, Common,
//!     PollingError::ZeroInterval => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failure shapes that show up in more than one crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    #[error("'{operation}' did not finish within {duration:?}")]
    Timeout { operation: String, duration: Duration },
}

impl CommonError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout { operation: operation.into(), duration }
    }

    /// Stable name for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
        }
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout { .. } => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Classification every error type in the workspace provides
pub trait ErrorClassification {
    /// Transient failures that may succeed when attempted again.
    fn is_retryable(&self) -> bool;

    fn severity(&self) -> ErrorSeverity;

    /// Broken invariants; these are bugs, not user-facing conditions.
    fn is_critical(&self) -> bool;

    /// Suggested wait before the next attempt, when the error knows one.
    fn retry_after(&self) -> Option<Duration>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected conditions, e.g. a record that is gone
    Info,
    /// Degraded but operational
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

/// Implements [`ErrorClassification`] for an enum with a `CommonError`
/// wrapping variant: that variant delegates, the listed patterns cover the
/// rest. `retry_after` defaults to `None` for patterns that omit it.
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $($variant => $retryable,)*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $($variant => $severity,)*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $($variant => $critical,)*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $($($variant => $retry_after,)?)*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}
