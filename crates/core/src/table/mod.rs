//! Generic data table
//!
//! A [`DataSource`](data_source::DataSource) owns the current page of rows
//! and the list query of one table. Filters, polling, search debounce and
//! selection are separate pieces it composes; [`TableView`](view::TableView)
//! is the read-only contract the rendering layer draws from.

pub mod changes;
pub mod data_source;
pub mod definition;
pub mod errors;
pub mod filters;
pub mod polling;
pub mod ports;
pub mod renderers;
pub mod search;
pub mod selection;
pub mod variants;
pub mod view;
