//! Shared test helpers for `evdash-core` integration tests.
//!
//! In-memory port implementations plus a small charger table fixture, so
//! the data source tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod ports;
