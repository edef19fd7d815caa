//! Central server REST client
//!
//! Thin authenticated layer over [`HttpClient`]: joins paths onto the
//! configured base URL, attaches the bearer token, and maps every
//! non-success status into an [`ApiError`] that keeps the status code.

use std::sync::Arc;
use std::time::Duration;

use evdash_domain::CentralServerConfig;
use reqwest::header::ACCEPT;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::{HttpClient, RetryPolicy};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the REST API (e.g. "https://ev.example/client/api")
    pub base_url: String,
    /// Overall timeout of one call, retries included
    pub timeout: Duration,
    /// Attempts per call. Table loads send exactly one request and leave
    /// retrying to the user, so configurations read from the console
    /// settings use 1.
    pub max_attempts: u32,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&CentralServerConfig::default())
    }
}

impl From<&CentralServerConfig> for ApiClientConfig {
    fn from(config: &CentralServerConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_attempts: 1,
        }
    }
}

/// Authenticated client of the central server
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Client for the REST API under `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is not an absolute URL or
    /// the HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL {}: {e}", config.base_url)))?;

        let http_client = HttpClient::new(
            config.timeout,
            concat!("evdash/", env!("CARGO_PKG_VERSION")),
            RetryPolicy::with_attempts(config.max_attempts),
        )
        .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http_client, auth, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Execute a GET request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, &[], None).await?;
        Self::decode(response).await
    }

    /// Execute a GET request with query parameters, in the given order
    #[instrument(skip(self, params), fields(path = %path, params = params.len()))]
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, params, None).await?;
        Self::decode(response).await
    }

    /// Execute a POST request
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Execute a PUT request
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self.execute(Method::PUT, path, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Execute a DELETE request, ignoring any response body
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, &[], None).await.map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let token = self.auth.access_token().await?;

        debug!(%method, url = %url, "API request");

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let timeout = self.config.timeout;
        let response = match tokio::time::timeout(timeout, self.http_client.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(ApiError::from_dash(err)),
            Err(_) => {
                warn!(url = %url, ?timeout, "API request timed out");
                return Err(ApiError::Timeout(timeout));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, &url, body));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|_| {
                ApiError::Decode(format!("empty {} response where a body was expected", status.as_u16()))
            });
        }

        response.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::Config(format!("Failed to serialize body: {e}")))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            body
        };
        ApiError::Status { status: status.as_u16(), url: url.to_string(), message }
    }
}
