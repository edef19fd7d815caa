//! Building blocks shared by the evdash crates.
//!
//! Nothing here knows about tables; the crate carries the error vocabulary
//! and the small async helpers the table layer is assembled from.
//!
//! Cargo features select what gets compiled:
//! - `foundation`: [`CommonError`] and the [`ErrorClassification`] contract
//! - `observability`: `tracing` events from the runtime helpers
//! - `runtime`: the [`Debouncer`] used by the search box
//! - `test-utils`: deadline helpers for tests that drive background tasks

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod error;

#[cfg(feature = "runtime")]
pub mod time;

#[cfg(any(feature = "runtime", feature = "test-utils", test))]
pub mod testing;

#[cfg(feature = "foundation")]
pub use error::{CommonError, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use time::{Debouncer, DebouncerConfig};
