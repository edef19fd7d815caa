//! Time utilities
//!
//! - **[`debounce`]**: trailing-edge debouncing of a value stream with
//!   distinct-until-changed suppression

pub mod debounce;

pub use debounce::{Debouncer, DebouncerConfig};
