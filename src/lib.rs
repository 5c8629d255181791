//! askdoc - Terminal chat client for a document Q&A backend.
//!
//! Core library providing the backend HTTP client, configuration,
//! and the ratatui chat interface.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
