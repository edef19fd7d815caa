use std::time::Duration;

use evdash_domain::constants::HTTP_STATUS_APP_UNAUTHORIZED_RANGE;
use evdash_domain::DashError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// When and how long to wait before sending a request again.
///
/// The default sends every request once. With more attempts, only transient
/// failures are resent: 5xx statuses outside the 550 series, timeouts and
/// connection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(attempts: u32) -> Self {
        Self { max_attempts: attempts.max(1), ..Self::default() }
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.base_backoff = base;
        self
    }

    /// Delay before retry number `retry` (1-based), doubling each time.
    fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1u32 << exponent).min(self.max_backoff)
    }

    fn retries_status(status: StatusCode) -> bool {
        status.is_server_error() && !HTTP_STATUS_APP_UNAUTHORIZED_RANGE.contains(&status.as_u16())
    }

    fn retries_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }
}

/// `reqwest` client that resends transient failures according to a
/// [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Build a client with a per-attempt timeout.
    ///
    /// # Errors
    /// Returns `DashError::Config` when the TLS backend cannot be set up.
    pub fn new(timeout: Duration, user_agent: &str, retry: RetryPolicy) -> Result<Self, DashError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .no_proxy()
            .build()
            .map_err(|err| DashError::from(InfraError::from(err)))?;

        Ok(Self { inner, retry: RetryPolicy { max_attempts: retry.max_attempts.max(1), ..retry } })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send `request`, resending it while the failure is transient and
    /// attempts remain.
    ///
    /// Non-success statuses that are not retried come back as `Ok`; mapping
    /// them is the caller's job.
    ///
    /// # Errors
    /// Returns `DashError::Network` once the last attempt fails in transport,
    /// or `DashError::Internal` if the request body cannot be cloned.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, DashError> {
        let mut attempt = 1;
        loop {
            let pending = request.try_clone().ok_or_else(|| {
                DashError::Internal("streaming request bodies cannot be resent".into())
            })?;
            let last = attempt >= self.retry.max_attempts;

            match pending.send().await {
                Ok(response) if !last && RetryPolicy::retries_status(response.status()) => {
                    warn!(attempt, status = %response.status(), "transient HTTP status, retrying");
                }
                Ok(response) => {
                    debug!(attempt, status = %response.status(), url = %response.url(), "HTTP response");
                    return Ok(response);
                }
                Err(err) if !last && RetryPolicy::retries_error(&err) => {
                    warn!(attempt, error = %err, "HTTP transport failure, retrying");
                }
                Err(err) => return Err(InfraError::from(err).into()),
            }

            let delay = self.retry.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
