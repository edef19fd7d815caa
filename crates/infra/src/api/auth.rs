//! API authentication
//!
//! The console signs in through its own flow; the REST client only needs the
//! resulting bearer token on every request.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::errors::ApiError;

/// Source of the bearer token attached to every central server request
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Token holder updated by the sign-in flow.
///
/// Until a token is set every request fails with [`ApiError::Auth`], which
/// the table layer treats like a 401.
#[derive(Debug, Default)]
pub struct SessionTokenProvider {
    token: RwLock<Option<String>>,
}

impl SessionTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        debug!("access token replaced");
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        debug!("access token cleared");
        self.token.write().take();
    }
}

#[async_trait]
impl AccessTokenProvider for SessionTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        self.token.read().clone().ok_or_else(|| ApiError::Auth("no active session".into()))
    }
}
