//! Central server API
//!
//! Authenticated REST client plus the adapters that plug it into the table
//! ports: list endpoints, row details and saved variants.

pub mod auth;
pub mod client;
pub mod errors;
pub mod list_endpoint;
pub mod variants;

pub use auth::{AccessTokenProvider, SessionTokenProvider};
pub use client::{ApiClient, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use list_endpoint::{RestDetailProvider, RestListEndpoint};
pub use variants::RestVariantStore;
