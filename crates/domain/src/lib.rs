//! Data model of the console's list tables.
//!
//! What a table is made of (columns, row actions, filters), what a list
//! request asks for (search, filters, sort, page) and what comes back (a
//! page of records wrapped in per-row UI state). Saved filter variants, the
//! session and the console configuration live here too.
//!
//! The crate is plain data plus validation. It depends on no other evdash
//! crate and performs no I/O.

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
