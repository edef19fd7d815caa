//! # evdash Infrastructure
//!
//! Infrastructure implementations of the table ports.
//!
//! This crate contains:
//! - The retrying HTTP client and the central server REST client
//! - REST adapters for list endpoints, row details and saved variants
//! - Configuration loading (environment, JSON and TOML files)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `evdash-core`
//! - Depends on `evdash-common`, `evdash-domain` and `evdash-core`
//! - Contains all "impure" code (network, filesystem, global subscriber)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, RestDetailProvider,
    RestListEndpoint, RestVariantStore, SessionTokenProvider,
};
pub use errors::InfraError;
pub use http::{HttpClient, RetryPolicy};
pub use observability::{init_tracing, LogFormat, LoggingConfig};
