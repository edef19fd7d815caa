//! HTTP transport with retry of transient failures

pub mod client;

pub use client::{HttpClient, RetryPolicy};
